use std::sync::Arc;

use icu::locale::Locale;

use crate::date::CalendarDate;
use crate::input_format::{InputIdentifier, TransformedText};
use crate::locale_data::{NumberingStyle, digit_value, resolve_numbering_system};
use crate::validator::{DateInputValidator, RangeCounterpart};

/// Result of feeding new text to a [`DateInputField`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputChange {
    /// Too long or not all digits; the field keeps its previous state.
    Rejected,
    /// The text was taken. `date` is set only for complete, valid input.
    Accepted {
        error: String,
        date: Option<CalendarDate>,
    },
}

/// Keystroke-level controller for one typed date.
pub struct DateInputField {
    validator: Arc<DateInputValidator>,
    input: InputIdentifier,
    text: String,
    error: String,
    date: Option<CalendarDate>,
}

impl DateInputField {
    pub fn new(validator: Arc<DateInputValidator>, input: InputIdentifier) -> Self {
        DateInputField {
            validator,
            input,
            text: String::new(),
            error: String::new(),
            date: None,
        }
    }

    /// A field pre-filled with `date` as the user would have typed it.
    pub fn with_initial(
        validator: Arc<DateInputValidator>,
        input: InputIdentifier,
        date: Option<CalendarDate>,
        locale: &Locale,
        numbering: NumberingStyle,
    ) -> Self {
        let text = validator
            .formatter()
            .format_input_without_delimiters(date.as_ref(), locale, numbering)
            .unwrap_or_default();
        DateInputField {
            validator,
            input,
            text,
            error: String::new(),
            date,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn date(&self) -> Option<CalendarDate> {
        self.date
    }

    pub fn input(&self) -> InputIdentifier {
        self.input
    }

    /// The text with delimiters inserted, for display.
    pub fn display(&self) -> TransformedText {
        self.validator.input_format().transform(&self.text)
    }

    pub fn on_value_change(
        &mut self,
        raw: &str,
        counterpart: RangeCounterpart,
        locale: &Locale,
        numbering: NumberingStyle,
    ) -> InputChange {
        let format = self.validator.input_format();
        let formatter = self.validator.formatter();
        let ns = resolve_numbering_system(formatter.locale_data(), locale, numbering);
        let length = raw.chars().count();
        if length > format.input_length() || !raw.chars().all(|c| digit_value(c, &ns).is_some()) {
            return InputChange::Rejected;
        }

        self.text = raw.to_string();
        if length < format.input_length() {
            self.error.clear();
            self.date = None;
        } else {
            let parsed = formatter.parse_without_delimiters(raw, locale, numbering);
            self.error = self
                .validator
                .validate(&parsed, self.input, counterpart, locale, numbering);
            self.date = match parsed {
                Ok(date) if self.error.is_empty() => Some(date),
                _ => None,
            };
        }
        InputChange::Accepted {
            error: self.error.clone(),
            date: self.date,
        }
    }
}
