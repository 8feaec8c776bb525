//! Locale data the formatter consults: skeleton to pattern resolution, Hijri
//! month and weekday names, native digits and the first day of the week.
//!
//! [`BuiltinLocaleData`] carries CLDR-derived tables for English, Arabic and
//! Persian and falls back to English for anything else. The first day of the
//! week comes from ICU's week data. Applications with richer data implement
//! [`LocaleData`] themselves.

use chrono::Weekday;
use icu::calendar::week::WeekInformation;
use icu::locale::extensions::unicode::Key;
use icu::locale::{Locale, LocaleExpander};
use tinystr::{TinyAsciiStr, tinystr};
use tracing::warn;

/// A CLDR numbering system identifier such as `latn` or `arab`.
pub type NumberingSystem = TinyAsciiStr<8>;

pub const LATN: NumberingSystem = tinystr!(8, "latn");

/// Which digits a formatted date uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NumberingStyle {
    /// ASCII 0-9 regardless of locale.
    #[default]
    Standard,
    /// The locale's own digits: its `-u-nu-` keyword when present, otherwise
    /// the locale data's default.
    Native,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextWidth {
    Abbreviated,
    Wide,
    Narrow,
}

pub trait LocaleData: Send + Sync {
    /// Locale-conventional concrete pattern for `skeleton`.
    fn best_pattern(&self, skeleton: &str, locale: &Locale) -> String;

    fn month_name(&self, month: u8, width: TextWidth, locale: &Locale) -> String;

    fn weekday_name(&self, weekday: Weekday, width: TextWidth, locale: &Locale) -> String;

    fn era_name(&self, width: TextWidth, locale: &Locale) -> String;

    fn default_numbering_system(&self, locale: &Locale) -> NumberingSystem;

    fn first_day_of_week(&self, locale: &Locale) -> Weekday;
}

/// Numbering system used for `locale` under `style`.
pub fn resolve_numbering_system(
    data: &dyn LocaleData,
    locale: &Locale,
    style: NumberingStyle,
) -> NumberingSystem {
    match style {
        NumberingStyle::Standard => LATN,
        NumberingStyle::Native => {
            let from_keyword = "nu"
                .parse::<Key>()
                .ok()
                .and_then(|key| locale.extensions.unicode.keywords.get(&key).map(|v| v.to_string()))
                .and_then(|nu| NumberingSystem::try_from_str(&nu).ok())
                .filter(|ns| zero_digit(ns).is_some());
            from_keyword.unwrap_or_else(|| data.default_numbering_system(locale))
        }
    }
}

fn zero_digit(ns: &NumberingSystem) -> Option<char> {
    match ns.as_str() {
        "latn" => Some('0'),
        "arab" => Some('\u{0660}'),
        "arabext" => Some('\u{06F0}'),
        "beng" => Some('\u{09E6}'),
        "deva" => Some('\u{0966}'),
        "fullwide" => Some('\u{FF10}'),
        "thai" => Some('\u{0E50}'),
        _ => None,
    }
}

/// Rewrites ASCII digits into the digits of `ns`.
pub fn transliterate_digits(s: &str, ns: &NumberingSystem) -> String {
    let zero = match zero_digit(ns) {
        Some('0') | None => return s.to_string(),
        Some(z) => z as u32,
    };
    s.chars()
        .map(|ch| match ch.to_digit(10) {
            Some(d) if ch.is_ascii_digit() => char::from_u32(zero + d).unwrap_or(ch),
            _ => ch,
        })
        .collect()
}

/// Value of an ASCII digit or a digit of `ns`.
pub fn digit_value(ch: char, ns: &NumberingSystem) -> Option<u32> {
    if ch.is_ascii_digit() {
        return ch.to_digit(10);
    }
    let zero = zero_digit(ns)? as u32;
    let offset = (ch as u32).checked_sub(zero)?;
    (offset < 10).then_some(offset)
}

/// Field widths requested by a skeleton, `0` when the field is absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct SkeletonFields {
    era: usize,
    year: usize,
    month: usize,
    day: usize,
    weekday: usize,
}

impl SkeletonFields {
    fn parse(skeleton: &str) -> Self {
        let mut fields = SkeletonFields::default();
        for (letter, width) in letter_runs(skeleton) {
            let slot = match letter {
                'G' => &mut fields.era,
                'y' | 'u' => &mut fields.year,
                'M' | 'L' => &mut fields.month,
                'd' => &mut fields.day,
                'E' | 'c' | 'e' => &mut fields.weekday,
                _ => continue,
            };
            *slot = (*slot).max(width);
        }
        fields
    }

    fn text_month(&self) -> bool {
        self.month >= 3
    }
}

fn letter_runs(s: &str) -> Vec<(char, usize)> {
    let mut runs: Vec<(char, usize)> = Vec::new();
    let mut quoted = false;
    for ch in s.chars() {
        if ch == '\'' {
            quoted = !quoted;
            continue;
        }
        if quoted || !ch.is_ascii_alphabetic() {
            continue;
        }
        match runs.last_mut() {
            Some((last, n)) if *last == ch => *n += 1,
            _ => runs.push((ch, 1)),
        }
    }
    runs
}

/// Applies the widths a skeleton asked for to a pattern taken from a table,
/// the way CLDR adjusts field lengths after picking the closest pattern.
fn adjust_field_widths(pattern: &str, wanted: &SkeletonFields) -> String {
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut chars = pattern.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\'' {
            out.push(ch);
            for quoted in chars.by_ref() {
                out.push(quoted);
                if quoted == '\'' {
                    break;
                }
            }
            continue;
        }
        if !ch.is_ascii_alphabetic() {
            out.push(ch);
            continue;
        }
        let mut width = 1;
        while chars.peek() == Some(&ch) {
            chars.next();
            width += 1;
        }
        let adjusted = match ch {
            'M' | 'L' if wanted.text_month() => wanted.month,
            'M' | 'L' | 'd' => {
                let asked = if ch == 'd' { wanted.day } else { wanted.month };
                width.max(asked)
            }
            'E' if wanted.weekday > 0 => wanted.weekday,
            'y' if wanted.year == 2 => 2,
            _ => width,
        };
        out.extend(std::iter::repeat_n(ch, adjusted));
    }
    out
}

struct PatternTable {
    full: &'static str,
    text: &'static str,
    numeric: &'static str,
    year_month_text: &'static str,
    year_month_numeric: &'static str,
    month_day_text: &'static str,
    month_day_numeric: &'static str,
}

const EN_US: PatternTable = PatternTable {
    full: "EEE, MMM d, y",
    text: "MMM d, y",
    numeric: "M/d/y",
    year_month_text: "MMM y",
    year_month_numeric: "M/y",
    month_day_text: "MMM d",
    month_day_numeric: "M/d",
};

const EN_GB: PatternTable = PatternTable {
    full: "EEE d MMM y",
    text: "d MMM y",
    numeric: "dd/MM/y",
    year_month_text: "MMM y",
    year_month_numeric: "MM/y",
    month_day_text: "d MMM",
    month_day_numeric: "dd/MM",
};

const AR: PatternTable = PatternTable {
    full: "EEE، d MMM y",
    text: "d MMM y",
    numeric: "d\u{200F}/M\u{200F}/y",
    year_month_text: "MMM y",
    year_month_numeric: "M\u{200F}/y",
    month_day_text: "d MMM",
    month_day_numeric: "d/\u{200F}M",
};

const FA: PatternTable = PatternTable {
    full: "EEE d MMM y",
    text: "d MMM y",
    numeric: "y/M/d",
    year_month_text: "MMM y",
    year_month_numeric: "y/M",
    month_day_text: "d MMM",
    month_day_numeric: "M/d",
};

const EN_MONTHS_WIDE: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabiʻ I",
    "Rabiʻ II",
    "Jumada I",
    "Jumada II",
    "Rajab",
    "Shaʻban",
    "Ramadan",
    "Shawwal",
    "Dhuʻl-Qiʻdah",
    "Dhuʻl-Hijjah",
];

const EN_MONTHS_ABBR: [&str; 12] = [
    "Muh.", "Saf.", "Rab. I", "Rab. II", "Jum. I", "Jum. II", "Raj.", "Sha.", "Ram.", "Shaw.",
    "Dhuʻl-Q.", "Dhuʻl-H.",
];

const AR_MONTHS: [&str; 12] = [
    "محرم",
    "صفر",
    "ربيع الأول",
    "ربيع الآخر",
    "جمادى الأولى",
    "جمادى الآخرة",
    "رجب",
    "شعبان",
    "رمضان",
    "شوال",
    "ذو القعدة",
    "ذو الحجة",
];

const FA_MONTHS: [&str; 12] = [
    "محرم",
    "صفر",
    "ربیع‌الاول",
    "ربیع‌الثانی",
    "جمادی‌الاول",
    "جمادی‌الثانی",
    "رجب",
    "شعبان",
    "رمضان",
    "شوال",
    "ذیقعده",
    "ذیحجه",
];

// Monday first.
const EN_WEEKDAYS_WIDE: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];
const EN_WEEKDAYS_ABBR: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const EN_WEEKDAYS_NARROW: [&str; 7] = ["M", "T", "W", "T", "F", "S", "S"];

const AR_WEEKDAYS: [&str; 7] = [
    "الاثنين",
    "الثلاثاء",
    "الأربعاء",
    "الخميس",
    "الجمعة",
    "السبت",
    "الأحد",
];
const AR_WEEKDAYS_NARROW: [&str; 7] = ["ن", "ث", "ر", "خ", "ج", "س", "ح"];

const FA_WEEKDAYS: [&str; 7] = [
    "دوشنبه",
    "سه‌شنبه",
    "چهارشنبه",
    "پنجشنبه",
    "جمعه",
    "شنبه",
    "یکشنبه",
];
const FA_WEEKDAYS_NARROW: [&str; 7] = ["د", "س", "چ", "پ", "ج", "ش", "ی"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Language {
    English,
    Arabic,
    Persian,
}

fn language_of(locale: &Locale) -> Language {
    match locale.id.language.as_str() {
        "ar" => Language::Arabic,
        "fa" => Language::Persian,
        _ => Language::English,
    }
}

fn region_of(locale: &Locale) -> Option<&str> {
    locale.id.region.as_ref().map(|r| r.as_str())
}

/// Table-driven CLDR subset for English, Arabic and Persian.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinLocaleData;

impl BuiltinLocaleData {
    fn table(&self, locale: &Locale) -> &'static PatternTable {
        match language_of(locale) {
            Language::Arabic => &AR,
            Language::Persian => &FA,
            Language::English => match region_of(locale) {
                None | Some("US") | Some("PH") | Some("CA") => &EN_US,
                Some(_) => &EN_GB,
            },
        }
    }
}

impl LocaleData for BuiltinLocaleData {
    fn best_pattern(&self, skeleton: &str, locale: &Locale) -> String {
        let wanted = SkeletonFields::parse(skeleton);
        let table = self.table(locale);
        let base = match (wanted.year > 0, wanted.month > 0, wanted.day > 0) {
            (true, true, true) if wanted.weekday > 0 => table.full,
            (true, true, true) if wanted.text_month() => table.text,
            (true, true, true) => table.numeric,
            (true, true, false) if wanted.text_month() => table.year_month_text,
            (true, true, false) => table.year_month_numeric,
            (false, true, true) if wanted.text_month() => table.month_day_text,
            (false, true, true) => table.month_day_numeric,
            _ => return skeleton.to_string(),
        };
        let mut pattern = adjust_field_widths(base, &wanted);
        if wanted.era > 0 {
            pattern.push(' ');
            pattern.extend(std::iter::repeat_n('G', wanted.era));
        }
        pattern
    }

    fn month_name(&self, month: u8, width: TextWidth, locale: &Locale) -> String {
        let index = usize::from(month.clamp(1, 12) - 1);
        match (language_of(locale), width) {
            // CLDR narrow Hijri month names are the month numbers.
            (_, TextWidth::Narrow) => month.to_string(),
            (Language::English, TextWidth::Wide) => EN_MONTHS_WIDE[index].to_string(),
            (Language::English, TextWidth::Abbreviated) => EN_MONTHS_ABBR[index].to_string(),
            (Language::Arabic, _) => AR_MONTHS[index].to_string(),
            (Language::Persian, _) => FA_MONTHS[index].to_string(),
        }
    }

    fn weekday_name(&self, weekday: Weekday, width: TextWidth, locale: &Locale) -> String {
        let index = weekday.num_days_from_monday() as usize;
        let name = match (language_of(locale), width) {
            (Language::English, TextWidth::Wide) => EN_WEEKDAYS_WIDE[index],
            (Language::English, TextWidth::Abbreviated) => EN_WEEKDAYS_ABBR[index],
            (Language::English, TextWidth::Narrow) => EN_WEEKDAYS_NARROW[index],
            (Language::Arabic, TextWidth::Narrow) => AR_WEEKDAYS_NARROW[index],
            (Language::Arabic, _) => AR_WEEKDAYS[index],
            (Language::Persian, TextWidth::Narrow) => FA_WEEKDAYS_NARROW[index],
            (Language::Persian, _) => FA_WEEKDAYS[index],
        };
        name.to_string()
    }

    fn era_name(&self, _width: TextWidth, locale: &Locale) -> String {
        match language_of(locale) {
            Language::English => "AH",
            Language::Arabic => "هـ",
            Language::Persian => "ه‍.ق.",
        }
        .to_string()
    }

    fn default_numbering_system(&self, locale: &Locale) -> NumberingSystem {
        match (language_of(locale), region_of(locale)) {
            (Language::Arabic, Some("DZ" | "MA" | "TN" | "LY" | "EH")) => LATN,
            (Language::Arabic, _) => tinystr!(8, "arab"),
            (Language::Persian, _) => tinystr!(8, "arabext"),
            (Language::English, _) => LATN,
        }
    }

    /// CLDR week data for the locale's region, after filling in the likely
    /// region when the tag has none.
    fn first_day_of_week(&self, locale: &Locale) -> Weekday {
        let mut maximized = locale.clone();
        LocaleExpander::new_extended().maximize(&mut maximized.id);
        match WeekInformation::try_new((&maximized).into()) {
            Ok(info) => weekday_from_icu(info.first_weekday),
            Err(err) => {
                warn!(%locale, %err, "no week data, using built-in first day");
                fallback_first_day(locale)
            }
        }
    }
}

fn weekday_from_icu(weekday: icu::calendar::types::Weekday) -> Weekday {
    use icu::calendar::types::Weekday as IcuWeekday;
    match weekday {
        IcuWeekday::Monday => Weekday::Mon,
        IcuWeekday::Tuesday => Weekday::Tue,
        IcuWeekday::Wednesday => Weekday::Wed,
        IcuWeekday::Thursday => Weekday::Thu,
        IcuWeekday::Friday => Weekday::Fri,
        IcuWeekday::Saturday => Weekday::Sat,
        IcuWeekday::Sunday => Weekday::Sun,
    }
}

fn fallback_first_day(locale: &Locale) -> Weekday {
    match (language_of(locale), region_of(locale)) {
        (Language::Arabic, Some("MA" | "TN")) => Weekday::Mon,
        (Language::Arabic | Language::Persian, _) => Weekday::Sat,
        (Language::English, None | Some("US" | "CA" | "PH")) => Weekday::Sun,
        (Language::English, _) => Weekday::Mon,
    }
}
