//! Calendar engine behind a Hijri date picker: month paging and grid layout,
//! range highlight geometry, selection, and locale-aware formatting, parsing
//! and validation of typed dates.

pub mod calendar_math;
pub mod chronology;
pub mod date;
pub mod error;
pub mod formatter;
pub mod input_field;
pub mod input_format;
pub mod locale_data;
pub mod pattern;
pub mod range;
pub mod selectable;
pub mod selection;
pub mod state;
pub mod validator;

pub use calendar_math::{DayCell, MonthGrid};
pub use chronology::Chronology;
pub use date::{CalendarDate, YearRange};
pub use error::{ConstructionError, DateError, ParseError, PatternError, StateError};
pub use formatter::DateFormatter;
pub use input_field::{DateInputField, InputChange};
pub use input_format::{DateInputFormat, InputIdentifier, TransformedText};
pub use locale_data::{BuiltinLocaleData, LocaleData, NumberingStyle, TextWidth};
pub use range::{GridCoordinates, SelectedRangeInfo};
pub use selectable::{AllDates, ExcludedDates, SelectableDates};
pub use selection::{Selection, SelectionMode};
pub use state::{DisplayMode, PickerState, YearItem};
pub use validator::{DateInputValidator, RangeCounterpart, ValidationMessages};
