use std::sync::Arc;

use icu::locale::Locale;
use tracing::debug;

use crate::date::{CalendarDate, YearRange};
use crate::error::ParseError;
use crate::formatter::DateFormatter;
use crate::input_format::{DateInputFormat, InputIdentifier};
use crate::locale_data::NumberingStyle;
use crate::selectable::SelectableDates;

/// User-facing validation messages. Each `{}` is replaced in order by the
/// message's arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationMessages {
    /// Argument: the input pattern, upper-cased.
    pub date_pattern: String,
    /// Arguments: first and last year of the range.
    pub out_of_year_range: String,
    /// Argument: the formatted date.
    pub not_allowed: String,
    pub range_order: String,
}

impl Default for ValidationMessages {
    fn default() -> Self {
        ValidationMessages {
            date_pattern: "Does not match the expected pattern: {}".to_string(),
            out_of_year_range: "Date is out of year range: {} - {}".to_string(),
            not_allowed: "Date is not allowed: {}".to_string(),
            range_order: "Invalid range input".to_string(),
        }
    }
}

fn fill(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut args = args.iter();
    let mut rest = template;
    while let Some(at) = rest.find("{}") {
        out.push_str(&rest[..at]);
        match args.next() {
            Some(arg) => out.push_str(arg),
            None => out.push_str("{}"),
        }
        rest = &rest[at + 2..];
    }
    out.push_str(rest);
    out
}

/// The other end of a range being typed. A missing start or end stands for
/// the earliest or latest date the calendar supports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RangeCounterpart {
    pub start: Option<CalendarDate>,
    pub end: Option<CalendarDate>,
}

/// Checks a typed date against the picker's constraints.
///
/// Checks run in a fixed order and stop at the first failure: the pattern,
/// the year range, selectability, then range order.
pub struct DateInputValidator {
    year_range: YearRange,
    selectable: Arc<dyn SelectableDates>,
    input_format: DateInputFormat,
    formatter: Arc<DateFormatter>,
    messages: ValidationMessages,
}

impl DateInputValidator {
    pub fn new(
        year_range: YearRange,
        selectable: Arc<dyn SelectableDates>,
        input_format: DateInputFormat,
        formatter: Arc<DateFormatter>,
        messages: ValidationMessages,
    ) -> Self {
        DateInputValidator {
            year_range,
            selectable,
            input_format,
            formatter,
            messages,
        }
    }

    pub fn input_format(&self) -> &DateInputFormat {
        &self.input_format
    }

    pub fn formatter(&self) -> &DateFormatter {
        &self.formatter
    }

    /// Returns the error message for `parsed`, or an empty string if it is
    /// acceptable.
    pub fn validate(
        &self,
        parsed: &Result<CalendarDate, ParseError>,
        input: InputIdentifier,
        counterpart: RangeCounterpart,
        locale: &Locale,
        numbering: NumberingStyle,
    ) -> String {
        let message = match parsed {
            Err(err) if err.is_year_out_of_bounds() => self.out_of_year_range(locale, numbering),
            Err(_) => fill(&self.messages.date_pattern, &[&self.input_format.upper_pattern()]),
            Ok(date) => self.check_date(date, input, counterpart, locale, numbering),
        };
        debug!(?input, ok = message.is_empty(), %message, "validated date input");
        message
    }

    fn check_date(
        &self,
        date: &CalendarDate,
        input: InputIdentifier,
        counterpart: RangeCounterpart,
        locale: &Locale,
        numbering: NumberingStyle,
    ) -> String {
        if !self.year_range.contains(date.year()) {
            return self.out_of_year_range(locale, numbering);
        }
        if !self.selectable.is_selectable_year(date.year()) || !self.selectable.is_selectable_date(date) {
            let formatted = self
                .formatter
                .format_date(Some(date), locale, NumberingStyle::Standard, false)
                .unwrap_or_default();
            return fill(&self.messages.not_allowed, &[&formatted]);
        }
        let out_of_order = match input {
            InputIdentifier::Start => counterpart
                .end
                .or_else(|| CalendarDate::max().ok())
                .is_some_and(|end| *date >= end),
            InputIdentifier::End => counterpart
                .start
                .or_else(|| CalendarDate::min().ok())
                .is_some_and(|start| *date < start),
            InputIdentifier::Single => false,
        };
        if out_of_order {
            return self.messages.range_order.clone();
        }
        String::new()
    }

    fn out_of_year_range(&self, locale: &Locale, numbering: NumberingStyle) -> String {
        let first = self
            .formatter
            .format_number(i64::from(self.year_range.first()), locale, numbering);
        let last = self
            .formatter
            .format_number(i64::from(self.year_range.last()), locale, numbering);
        fill(&self.messages.out_of_year_range, &[&first, &last])
    }
}
