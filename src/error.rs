use thiserror::Error;

/// A field combination the Hijri chronology cannot represent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Invalid value for YearOfEra (valid values {min} - {max}): {year}")]
    YearOutOfBounds { year: i32, min: i32, max: i32 },
    #[error("Invalid value for MonthOfYear (valid values 1 - 12): {0}")]
    MonthOutOfRange(i64),
    #[error("Invalid value for DayOfMonth (valid values 1 - {length}): {day}")]
    DayOutOfRange { day: i64, length: u8 },
}

/// Failure to turn user text into a [`CalendarDate`](crate::CalendarDate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Text '{text}' could not be parsed at index {position}: expected {expected}")]
    Mismatch {
        text: String,
        position: usize,
        expected: String,
    },
    #[error("Text '{text}' could not be parsed, unparsed text found at index {position}")]
    TrailingText { text: String, position: usize },
    #[error("Text '{text}' is missing the {field} field")]
    MissingField { text: String, field: &'static str },
    #[error("Text '{text}' names a weekday that conflicts with the date")]
    InconsistentWeekday { text: String },
    #[error(transparent)]
    Field(#[from] DateError),
}

impl ParseError {
    /// True when the parser's own field-range check rejected the year.
    pub fn is_year_out_of_bounds(&self) -> bool {
        matches!(self, ParseError::Field(DateError::YearOutOfBounds { .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("empty date pattern")]
    Empty,
    #[error("unsupported pattern letter '{letter}' in \"{pattern}\"")]
    UnsupportedField { letter: char, pattern: String },
    #[error("unterminated quoted literal in \"{0}\"")]
    UnterminatedQuote(String),
}

/// Invalid configuration, reported when a value is built rather than later
/// when it is used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("year range {first}..={last} is empty")]
    InvalidYearRange { first: i32, last: i32 },
    #[error("input pattern \"{pattern}\" must contain the delimiter '{delimiter}' exactly twice, found {found}")]
    DelimiterCount {
        pattern: String,
        delimiter: char,
        found: usize,
    },
    #[error("input pattern \"{pattern}\" has an empty field between delimiters")]
    EmptyInputField { pattern: String },
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("year {year} is outside the picker's year range {first}..={last}")]
    OutOfYearRange { year: i32, first: i32, last: i32 },
    #[error(transparent)]
    Date(#[from] DateError),
}
