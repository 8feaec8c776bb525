use std::fmt;
use std::sync::Arc;

use chrono::Weekday;
use icu::locale::{Locale, locale};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::chronology::Chronology;
use crate::date::CalendarDate;
use crate::error::{ConstructionError, ParseError, PatternError};
use crate::input_format::DateInputFormat;
use crate::locale_data::{
    BuiltinLocaleData, LATN, LocaleData, NumberingStyle, resolve_numbering_system,
    transliterate_digits,
};
use crate::pattern::CompiledPattern;

pub const DEFAULT_YEAR_MONTH_SKELETON: &str = "yMMMM";
pub const DEFAULT_SELECTED_DATE_SKELETON: &str = "yMMMEEEd";
pub const DEFAULT_DESCRIPTION_SKELETON: &str = "yMMMMd";
pub const DEFAULT_INPUT_SKELETON: &str = "yyyy/MM/dd";
pub const DEFAULT_DELIMITER: char = '/';

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FormatterKey {
    pattern: String,
    locale: Locale,
    numbering: NumberingStyle,
}

/// Skeleton-driven formatting and parsing of [`CalendarDate`]s.
///
/// Skeletons name the fields wanted; the locale data turns each into the
/// locale's conventional pattern. Compiled patterns are memoized per
/// (pattern, locale, numbering style) for the life of the formatter.
pub struct DateFormatter {
    year_month_skeleton: String,
    selected_date_skeleton: String,
    description_skeleton: String,
    input_format: DateInputFormat,
    locale_data: Arc<dyn LocaleData>,
    chronology: Chronology,
    cache: Mutex<FxHashMap<FormatterKey, Arc<CompiledPattern>>>,
}

impl DateFormatter {
    /// Fails if any skeleton is not a valid pattern, or if the input skeleton
    /// does not split into three fields around `delimiter`.
    pub fn new(
        year_month_skeleton: &str,
        selected_date_skeleton: &str,
        description_skeleton: &str,
        input_skeleton: &str,
        delimiter: char,
    ) -> Result<Self, ConstructionError> {
        let input_format = DateInputFormat::new(input_skeleton, delimiter)?;
        let data = BuiltinLocaleData;
        let und = locale!("und");
        for skeleton in [
            year_month_skeleton,
            selected_date_skeleton,
            description_skeleton,
            input_skeleton,
        ] {
            CompiledPattern::compile(skeleton, &und, LATN, Chronology::UmmAlQura, &data)?;
        }
        Ok(DateFormatter {
            year_month_skeleton: year_month_skeleton.to_string(),
            selected_date_skeleton: selected_date_skeleton.to_string(),
            description_skeleton: description_skeleton.to_string(),
            input_format,
            locale_data: Arc::new(data),
            chronology: Chronology::default(),
            cache: Mutex::new(FxHashMap::default()),
        })
    }

    pub fn with_locale_data(mut self, data: Arc<dyn LocaleData>) -> Self {
        self.locale_data = data;
        self.cache.get_mut().clear();
        self
    }

    pub fn with_chronology(mut self, chronology: Chronology) -> Self {
        self.chronology = chronology;
        self.cache.get_mut().clear();
        self
    }

    pub fn chronology(&self) -> Chronology {
        self.chronology
    }

    pub fn delimiter(&self) -> char {
        self.input_format.delimiter()
    }

    pub fn input_skeleton(&self) -> &str {
        self.input_format.pattern_with_delimiters()
    }

    pub fn input_format(&self) -> &DateInputFormat {
        &self.input_format
    }

    pub fn locale_data(&self) -> &dyn LocaleData {
        self.locale_data.as_ref()
    }

    pub fn first_day_of_week(&self, locale: &Locale) -> Weekday {
        self.locale_data.first_day_of_week(locale)
    }

    /// Number of compiled patterns held in the cache.
    pub fn cached_formatters(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn format_headline(
        &self,
        date: Option<&CalendarDate>,
        locale: &Locale,
        numbering: NumberingStyle,
    ) -> Option<String> {
        let date = date?;
        Some(self.format_with_skeleton(&self.selected_date_skeleton, date, locale, numbering))
    }

    pub fn format_date(
        &self,
        date: Option<&CalendarDate>,
        locale: &Locale,
        numbering: NumberingStyle,
        for_description: bool,
    ) -> Option<String> {
        let date = date?;
        let skeleton = if for_description {
            &self.description_skeleton
        } else {
            &self.selected_date_skeleton
        };
        Some(self.format_with_skeleton(skeleton, date, locale, numbering))
    }

    pub fn format_month_year(
        &self,
        date: Option<&CalendarDate>,
        locale: &Locale,
        numbering: NumberingStyle,
    ) -> Option<String> {
        let date = date?;
        Some(self.format_with_skeleton(&self.year_month_skeleton, date, locale, numbering))
    }

    /// Formats with the input skeleton stripped of delimiters, used as is
    /// rather than localized, so the text lines up with what the user types.
    pub fn format_input_without_delimiters(
        &self,
        date: Option<&CalendarDate>,
        locale: &Locale,
        numbering: NumberingStyle,
    ) -> Option<String> {
        let date = date?;
        let pattern = self.input_format.without_delimiters();
        match self.compiled(pattern, locale, numbering) {
            Ok(p) => Some(p.format(date)),
            Err(err) => {
                warn!(%pattern, skeleton = self.input_skeleton(), %err, "input pattern rejected");
                Some(date.to_string())
            }
        }
    }

    /// Parses delimiter-free input by putting the delimiters back where the
    /// input skeleton has them and parsing against the raw skeleton.
    pub fn parse_without_delimiters(
        &self,
        text: &str,
        locale: &Locale,
        numbering: NumberingStyle,
    ) -> Result<CalendarDate, ParseError> {
        let with_delimiters = self.insert_delimiters(text);
        let skeleton = self.input_skeleton();
        let compiled = self
            .compiled(skeleton, locale, numbering)
            .map_err(|_| ParseError::Mismatch {
                text: text.to_string(),
                position: 0,
                expected: skeleton.to_string(),
            })?;
        compiled.parse(&with_delimiters)
    }

    /// `value` in the digits `numbering` selects for `locale`.
    pub fn format_number(&self, value: i64, locale: &Locale, numbering: NumberingStyle) -> String {
        let ns = resolve_numbering_system(self.locale_data.as_ref(), locale, numbering);
        transliterate_digits(&value.to_string(), &ns)
    }

    /// Text too short to reach the second delimiter is returned as is and
    /// fails to parse.
    fn insert_delimiters(&self, text: &str) -> String {
        let first = self.input_format.first_delimiter_index();
        let second = self.input_format.last_delimiter_index() - 1;
        let delimiter = self.input_format.delimiter();
        let chars: Vec<char> = text.chars().collect();
        if second > chars.len() {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len() + 2);
        out.extend(&chars[..first]);
        out.push(delimiter);
        out.extend(&chars[first..second]);
        out.push(delimiter);
        out.extend(&chars[second..]);
        out
    }

    fn format_with_skeleton(
        &self,
        skeleton: &str,
        date: &CalendarDate,
        locale: &Locale,
        numbering: NumberingStyle,
    ) -> String {
        let pattern = self.locale_data.best_pattern(skeleton, locale);
        let compiled = self.compiled(&pattern, locale, numbering).or_else(|err| {
            warn!(%pattern, %skeleton, %err, "locale pattern rejected, using skeleton");
            self.compiled(skeleton, locale, numbering)
        });
        match compiled {
            Ok(p) => p.format(date),
            Err(err) => {
                warn!(%skeleton, %err, "skeleton rejected, formatting as ISO");
                date.to_string()
            }
        }
    }

    fn compiled(
        &self,
        pattern: &str,
        locale: &Locale,
        numbering: NumberingStyle,
    ) -> Result<Arc<CompiledPattern>, PatternError> {
        let key = FormatterKey {
            pattern: pattern.to_string(),
            locale: locale.clone(),
            numbering,
        };
        if let Some(hit) = self.cache.lock().get(&key) {
            return Ok(Arc::clone(hit));
        }

        let ns = resolve_numbering_system(self.locale_data.as_ref(), locale, numbering);
        debug!(%pattern, %locale, numbering_system = %ns, "compiling date pattern");
        let compiled = Arc::new(CompiledPattern::compile(
            pattern,
            locale,
            ns,
            self.chronology,
            self.locale_data.as_ref(),
        )?);
        Ok(Arc::clone(self.cache.lock().entry(key).or_insert(compiled)))
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        DateFormatter {
            year_month_skeleton: DEFAULT_YEAR_MONTH_SKELETON.to_string(),
            selected_date_skeleton: DEFAULT_SELECTED_DATE_SKELETON.to_string(),
            description_skeleton: DEFAULT_DESCRIPTION_SKELETON.to_string(),
            input_format: DateInputFormat::default(),
            locale_data: Arc::new(BuiltinLocaleData),
            chronology: Chronology::default(),
            cache: Mutex::new(FxHashMap::default()),
        }
    }
}

impl fmt::Debug for DateFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateFormatter")
            .field("year_month_skeleton", &self.year_month_skeleton)
            .field("selected_date_skeleton", &self.selected_date_skeleton)
            .field("description_skeleton", &self.description_skeleton)
            .field("input_format", &self.input_format)
            .field("chronology", &self.chronology)
            .field("cached_formatters", &self.cached_formatters())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(s: &str) -> Locale {
        s.parse().unwrap()
    }

    fn date(y: i32, m: u8, d: u8) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    #[test]
    fn none_means_no_date() {
        let f = DateFormatter::default();
        let en = loc("en");
        assert_eq!(f.format_headline(None, &en, NumberingStyle::Standard), None);
        assert_eq!(f.format_month_year(None, &en, NumberingStyle::Standard), None);
        assert_eq!(f.format_date(None, &en, NumberingStyle::Standard, true), None);
        assert_eq!(f.format_input_without_delimiters(None, &en, NumberingStyle::Standard), None);
        assert_eq!(f.cached_formatters(), 0);
    }

    #[test]
    fn default_skeletons_resolve_per_locale() {
        let f = DateFormatter::default();
        let d = date(1446, 9, 1);
        let std = NumberingStyle::Standard;
        assert_eq!(f.format_month_year(Some(&d), &loc("en"), std).unwrap(), "Ramadan 1446");
        assert_eq!(f.format_headline(Some(&d), &loc("en"), std).unwrap(), "Sat, Ram. 1, 1446");
        assert_eq!(f.format_date(Some(&d), &loc("en"), std, true).unwrap(), "Ramadan 1, 1446");
        assert_eq!(f.format_date(Some(&d), &loc("en-GB"), std, true).unwrap(), "1 Ramadan 1446");
        assert_eq!(
            f.format_input_without_delimiters(Some(&d), &loc("en"), std).unwrap(),
            "14460901"
        );
    }

    #[test]
    fn native_numbering_uses_locale_digits() {
        let f = DateFormatter::default();
        let d = date(1446, 9, 1);
        let ar = loc("ar");
        assert_eq!(
            f.format_month_year(Some(&d), &ar, NumberingStyle::Native).unwrap(),
            "رمضان ١٤٤٦"
        );
        assert_eq!(
            f.format_month_year(Some(&d), &ar, NumberingStyle::Standard).unwrap(),
            "رمضان 1446"
        );
        assert_eq!(f.format_number(1450, &ar, NumberingStyle::Native), "١٤٥٠");
        assert_eq!(f.format_number(1450, &ar, NumberingStyle::Standard), "1450");
    }

    #[test]
    fn formatting_is_idempotent_and_cached() {
        let f = DateFormatter::default();
        let d = date(1446, 9, 1);
        let en = loc("en");
        let first = f.format_headline(Some(&d), &en, NumberingStyle::Standard);
        assert_eq!(f.cached_formatters(), 1);
        let second = f.format_headline(Some(&d), &en, NumberingStyle::Standard);
        assert_eq!(first, second);
        assert_eq!(f.cached_formatters(), 1);

        f.format_headline(Some(&d), &en, NumberingStyle::Native);
        f.format_headline(Some(&d), &loc("ar"), NumberingStyle::Standard);
        assert_eq!(f.cached_formatters(), 3);
    }

    #[test]
    fn parse_reinserts_delimiters() {
        let f = DateFormatter::default();
        let en = loc("en");
        let d = date(1446, 9, 1);
        assert_eq!(f.insert_delimiters("14460901"), "1446/09/01");
        assert_eq!(f.parse_without_delimiters("14460901", &en, NumberingStyle::Standard).unwrap(), d);
        assert_eq!(
            f.parse_without_delimiters("١٤٤٦٠٩٠١", &loc("ar"), NumberingStyle::Native).unwrap(),
            d
        );
        assert!(f.parse_without_delimiters("1446", &en, NumberingStyle::Standard).is_err());
        assert!(
            f.parse_without_delimiters("12000101", &en, NumberingStyle::Standard)
                .unwrap_err()
                .is_year_out_of_bounds()
        );
    }

    #[test]
    fn custom_skeletons_are_validated() {
        assert!(DateFormatter::new("yMMMM", "yMMMEEEd", "yMMMMd", "dd/MM/yyyy", '/').is_ok());
        assert!(matches!(
            DateFormatter::new("yMMMM", "yMMMEEEd", "yMMMMd", "dd/MM/yyyy hh", '/'),
            Err(ConstructionError::Pattern(PatternError::UnsupportedField { letter: 'h', .. }))
        ));
    }

    #[test]
    fn input_skeleton_needs_two_delimiters() {
        assert!(matches!(
            DateFormatter::new("yMMMM", "yMMMEEEd", "yMMMMd", "yyyy/MMdd", '/'),
            Err(ConstructionError::DelimiterCount { found: 1, .. })
        ));
        assert!(matches!(
            DateFormatter::new("yMMMM", "yMMMEEEd", "yMMMMd", "yyyy//dd", '/'),
            Err(ConstructionError::EmptyInputField { .. })
        ));
    }

    #[test]
    fn custom_input_skeleton_reads_its_own_output() {
        let f = DateFormatter::new("yMMMM", "yMMMEEEd", "yMMMMd", "dd.MM.yyyy", '.').unwrap();
        let en = loc("en");
        let d = date(1446, 9, 1);
        let typed = f
            .format_input_without_delimiters(Some(&d), &en, NumberingStyle::Standard)
            .unwrap();
        assert_eq!(typed, "01091446");
        assert_eq!(f.insert_delimiters(&typed), "01.09.1446");
        assert_eq!(f.parse_without_delimiters(&typed, &en, NumberingStyle::Standard).unwrap(), d);
    }

    #[test]
    fn formatter_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DateFormatter>();

        let f = Arc::new(DateFormatter::default());
        let d = date(1446, 9, 1);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let f = Arc::clone(&f);
                std::thread::spawn(move || {
                    f.format_month_year(Some(&d), &"en".parse().unwrap(), NumberingStyle::Standard)
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap().as_deref(), Some("Ramadan 1446"));
        }
        assert_eq!(f.cached_formatters(), 1);
    }
}
