//! Compiled CLDR-style date patterns.
//!
//! A pattern is compiled once per (pattern, locale, numbering system) with the
//! locale's names already looked up, then used for any number of format and
//! parse calls.

use icu::locale::Locale;

use crate::chronology::Chronology;
use crate::date::CalendarDate;
use crate::error::{DateError, ParseError, PatternError};
use crate::locale_data::{LocaleData, NumberingSystem, TextWidth, digit_value, transliterate_digits};

/// Two-digit years are read as 1400-1499.
const TWO_DIGIT_YEAR_BASE: i64 = 1400;

/// Longest digit run accepted for a variable-width field.
const MAX_DIGITS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Numeric {
    Year,
    Month,
    Day,
}

impl Numeric {
    fn name(self) -> &'static str {
        match self {
            Numeric::Year => "year",
            Numeric::Month => "month",
            Numeric::Day => "day",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Item {
    Literal(String),
    Number { field: Numeric, width: usize },
    TwoDigitYear,
    MonthName(Vec<String>),
    /// Monday first.
    WeekdayName(Vec<String>),
    Era(String),
}

impl Item {
    fn is_numeric(&self) -> bool {
        matches!(self, Item::Number { .. } | Item::TwoDigitYear)
    }
}

enum Token {
    Literal(String),
    Field(char, usize),
}

fn tokenize(pattern: &str) -> Result<Vec<Token>, PatternError> {
    if pattern.is_empty() {
        return Err(PatternError::Empty);
    }
    let mut tokens = Vec::new();
    let mut chars = pattern.chars().peekable();
    fn push_literal(tokens: &mut Vec<Token>, s: &str) {
        match tokens.last_mut() {
            Some(Token::Literal(prev)) => prev.push_str(s),
            _ => tokens.push(Token::Literal(s.to_string())),
        }
    }

    while let Some(ch) = chars.next() {
        if ch == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                push_literal(&mut tokens, "'");
                continue;
            }
            let mut quoted = String::new();
            let mut closed = false;
            while let Some(q) = chars.next() {
                if q == '\'' {
                    if chars.peek() == Some(&'\'') {
                        chars.next();
                        quoted.push('\'');
                        continue;
                    }
                    closed = true;
                    break;
                }
                quoted.push(q);
            }
            if !closed {
                return Err(PatternError::UnterminatedQuote(pattern.to_string()));
            }
            push_literal(&mut tokens, &quoted);
        } else if ch.is_ascii_alphabetic() {
            let mut width = 1;
            while chars.peek() == Some(&ch) {
                chars.next();
                width += 1;
            }
            tokens.push(Token::Field(ch, width));
        } else {
            push_literal(&mut tokens, ch.encode_utf8(&mut [0; 4]));
        }
    }
    Ok(tokens)
}

fn text_width(width: usize) -> TextWidth {
    match width {
        4 => TextWidth::Wide,
        5.. => TextWidth::Narrow,
        _ => TextWidth::Abbreviated,
    }
}

/// A pattern bound to a locale, numbering system and chronology.
#[derive(Clone, Debug)]
pub struct CompiledPattern {
    pattern: String,
    items: Vec<Item>,
    numbering: NumberingSystem,
    chronology: Chronology,
}

impl CompiledPattern {
    pub fn compile(
        pattern: &str,
        locale: &Locale,
        numbering: NumberingSystem,
        chronology: Chronology,
        data: &dyn LocaleData,
    ) -> Result<Self, PatternError> {
        let mut items = Vec::new();
        for token in tokenize(pattern)? {
            let item = match token {
                Token::Literal(s) => Item::Literal(s),
                Token::Field('G', width) => Item::Era(data.era_name(text_width(width), locale)),
                Token::Field('y', 2) => Item::TwoDigitYear,
                Token::Field('y', width) => Item::Number {
                    field: Numeric::Year,
                    width,
                },
                Token::Field('M' | 'L', width @ 1..=2) => Item::Number {
                    field: Numeric::Month,
                    width,
                },
                Token::Field('M' | 'L', width) => Item::MonthName(
                    (1..=12)
                        .map(|m| data.month_name(m, text_width(width), locale))
                        .collect(),
                ),
                Token::Field('d', width @ 1..=2) => Item::Number {
                    field: Numeric::Day,
                    width,
                },
                Token::Field('E' | 'c', width) => Item::WeekdayName(
                    (0..7)
                        .map(|i| {
                            data.weekday_name(crate::date::weekday_from_index(i), text_width(width), locale)
                        })
                        .collect(),
                ),
                Token::Field(letter, _) => {
                    return Err(PatternError::UnsupportedField {
                        letter,
                        pattern: pattern.to_string(),
                    });
                }
            };
            items.push(item);
        }
        Ok(CompiledPattern {
            pattern: pattern.to_string(),
            items,
            numbering,
            chronology,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn numbering_system(&self) -> NumberingSystem {
        self.numbering
    }

    pub fn format(&self, date: &CalendarDate) -> String {
        let mut out = String::new();
        for item in &self.items {
            match item {
                Item::Literal(s) => out.push_str(s),
                Item::Number { field, width } => {
                    let value = match field {
                        Numeric::Year => i64::from(date.year()),
                        Numeric::Month => i64::from(date.month()),
                        Numeric::Day => i64::from(date.day()),
                    };
                    let digits = format!("{value:0width$}");
                    out.push_str(&transliterate_digits(&digits, &self.numbering));
                }
                Item::TwoDigitYear => {
                    let digits = format!("{:02}", date.year().rem_euclid(100));
                    out.push_str(&transliterate_digits(&digits, &self.numbering));
                }
                Item::MonthName(names) => {
                    if let Some(name) = names.get(usize::from(date.month()) - 1) {
                        out.push_str(name);
                    }
                }
                Item::WeekdayName(names) => {
                    let index = date.day_of_week().num_days_from_monday() as usize;
                    out.push_str(&names[index]);
                }
                Item::Era(name) => out.push_str(name),
            }
        }
        out
    }

    /// Parses the whole of `text`. Digits may be ASCII or those of the
    /// pattern's numbering system; names match case-insensitively.
    pub fn parse(&self, text: &str) -> Result<CalendarDate, ParseError> {
        let chars: Vec<char> = text.chars().collect();
        let mut pos = 0;
        let mut year = None;
        let mut month = None;
        let mut day = None;
        let mut weekday_text: Option<String> = None;

        let mismatch = |position: usize, expected: &str| ParseError::Mismatch {
            text: text.to_string(),
            position,
            expected: expected.to_string(),
        };

        for (index, item) in self.items.iter().enumerate() {
            let rest = &chars[pos..];
            match item {
                Item::Literal(s) => {
                    let len = match_len(rest, s).ok_or_else(|| mismatch(pos, &format!("'{s}'")))?;
                    pos += len;
                }
                Item::Number { field, width } => {
                    let adjacent = self.items.get(index + 1).is_some_and(Item::is_numeric);
                    let (min, max) = match (field, *width) {
                        (Numeric::Year, w) => (w, if adjacent { w } else { MAX_DIGITS.max(w) }),
                        (_, 1) if !adjacent => (1, 2),
                        (_, w) => (w, w),
                    };
                    let (value, len) = self
                        .read_number(rest, min, max)
                        .ok_or_else(|| mismatch(pos, &format!("{} digits", field.name())))?;
                    pos += len;
                    match field {
                        Numeric::Year => year = Some(value),
                        Numeric::Month => month = Some(value),
                        Numeric::Day => day = Some(value),
                    }
                }
                Item::TwoDigitYear => {
                    let (value, len) = self
                        .read_number(rest, 2, 2)
                        .ok_or_else(|| mismatch(pos, "two year digits"))?;
                    pos += len;
                    year = Some(TWO_DIGIT_YEAR_BASE + value);
                }
                Item::MonthName(names) => {
                    let (m, len) =
                        longest_match(rest, names).ok_or_else(|| mismatch(pos, "month name"))?;
                    pos += len;
                    month = Some(m as i64 + 1);
                }
                Item::WeekdayName(names) => {
                    let (_, len) =
                        longest_match(rest, names).ok_or_else(|| mismatch(pos, "weekday name"))?;
                    weekday_text = Some(rest[..len].iter().collect());
                    pos += len;
                }
                Item::Era(name) => {
                    let len = match_len(rest, name).ok_or_else(|| mismatch(pos, "era"))?;
                    pos += len;
                }
            }
        }

        if pos < chars.len() {
            return Err(ParseError::TrailingText {
                text: text.to_string(),
                position: pos,
            });
        }

        let missing = |field| ParseError::MissingField {
            text: text.to_string(),
            field,
        };
        let year = year.ok_or_else(|| missing("year"))?;
        let month = month.ok_or_else(|| missing("month"))?;
        let day = day.ok_or_else(|| missing("day"))?;
        let year = i32::try_from(year).map_err(|_| DateError::YearOutOfBounds {
            year: i32::MAX,
            min: Chronology::MIN_YEAR,
            max: Chronology::MAX_YEAR,
        })?;

        let date = CalendarDate::from_fields(self.chronology, year, month, day)?;

        // Narrow names repeat, so compare by name rather than by index.
        if let Some(typed) = weekday_text {
            let Some(Item::WeekdayName(names)) =
                self.items.iter().find(|i| matches!(i, Item::WeekdayName(_)))
            else {
                return Ok(date);
            };
            let actual = &names[date.day_of_week().num_days_from_monday() as usize];
            if match_len(&typed.chars().collect::<Vec<_>>(), actual) != Some(typed.chars().count()) {
                return Err(ParseError::InconsistentWeekday {
                    text: text.to_string(),
                });
            }
        }
        Ok(date)
    }

    fn read_number(&self, rest: &[char], min: usize, max: usize) -> Option<(i64, usize)> {
        let mut value: i64 = 0;
        let mut len = 0;
        for &ch in rest.iter().take(max) {
            let Some(d) = digit_value(ch, &self.numbering) else {
                break;
            };
            value = value.checked_mul(10)?.checked_add(i64::from(d))?;
            len += 1;
        }
        (len >= min && len > 0).then_some((value, len))
    }
}

/// Length of `expected` if `text` starts with it, ignoring case.
fn match_len(text: &[char], expected: &str) -> Option<usize> {
    let mut len = 0;
    for want in expected.chars() {
        let got = text.get(len)?;
        if !got.to_lowercase().eq(want.to_lowercase()) {
            return None;
        }
        len += 1;
    }
    Some(len)
}

fn longest_match(text: &[char], names: &[String]) -> Option<(usize, usize)> {
    names
        .iter()
        .enumerate()
        .filter_map(|(i, name)| match_len(text, name).filter(|len| *len > 0).map(|len| (i, len)))
        .max_by_key(|&(i, len)| (len, std::cmp::Reverse(i)))
}
