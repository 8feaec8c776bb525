use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::chronology::{Chronology, HijriDay};
use crate::error::{ConstructionError, DateError};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Weekday at `index` counting from Monday = 0, wrapping modulo 7.
pub fn weekday_from_index(index: i32) -> Weekday {
    WEEK[index.rem_euclid(7) as usize]
}

/// A single day in the Hijri calendar.
///
/// Equality, ordering and hashing use the absolute day count, so two dates
/// compare correctly across month and year boundaries and across
/// chronologies.
#[derive(Clone, Copy)]
pub struct CalendarDate {
    day_number: i32,
    year: i32,
    month: u8,
    day: u8,
    month_length: u8,
    chronology: Chronology,
}

impl CalendarDate {
    /// Builds an Umm al-Qura date.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, DateError> {
        Self::new_in(Chronology::UmmAlQura, year, month, day)
    }

    pub fn new_in(chronology: Chronology, year: i32, month: u8, day: u8) -> Result<Self, DateError> {
        Self::from_fields(chronology, year, i64::from(month), i64::from(day))
    }

    /// Builds a date from wide field values as they come out of a parser, so
    /// that an oversized month or day is reported instead of truncated.
    pub(crate) fn from_fields(
        chronology: Chronology,
        year: i32,
        month: i64,
        day: i64,
    ) -> Result<Self, DateError> {
        let resolved = chronology.resolve(year, month, day)?;
        Ok(Self::from_resolved(chronology, resolved))
    }

    /// Builds the date for a proleptic Gregorian day count (0001-01-01 is day 1).
    pub fn from_day_number(chronology: Chronology, day_number: i32) -> Result<Self, DateError> {
        let resolved = chronology.fields_for_day_number(day_number)?;
        Ok(Self::from_resolved(chronology, resolved))
    }

    pub fn from_iso(chronology: Chronology, iso: NaiveDate) -> Result<Self, DateError> {
        Self::from_day_number(chronology, iso.num_days_from_ce())
    }

    /// Today in the local time zone.
    pub fn today() -> Result<Self, DateError> {
        Self::today_in(Chronology::UmmAlQura)
    }

    pub fn today_in(chronology: Chronology) -> Result<Self, DateError> {
        let resolved = chronology.today()?;
        Ok(Self::from_resolved(chronology, resolved))
    }

    /// 1 Muharram of [`Chronology::MIN_YEAR`].
    pub fn min() -> Result<Self, DateError> {
        Self::new(Chronology::MIN_YEAR, 1, 1)
    }

    /// Last day of Dhu al-Hijjah of [`Chronology::MAX_YEAR`].
    pub fn max() -> Result<Self, DateError> {
        Ok(Self::new(Chronology::MAX_YEAR, 12, 1)?.last_of_month())
    }

    fn from_resolved(chronology: Chronology, d: HijriDay) -> Self {
        CalendarDate {
            day_number: d.day_number,
            year: d.year,
            month: d.month,
            day: d.day,
            month_length: d.month_length,
            chronology,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month of year, 1 (Muharram) to 12 (Dhu al-Hijjah).
    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn day_of_week(&self) -> Weekday {
        // Day 1 (0001-01-01) was a Monday.
        weekday_from_index(self.day_number - 1)
    }

    pub fn length_of_month(&self) -> u8 {
        self.month_length
    }

    pub fn day_number(&self) -> i32 {
        self.day_number
    }

    pub fn chronology(&self) -> Chronology {
        self.chronology
    }

    pub fn to_iso(&self) -> Option<NaiveDate> {
        NaiveDate::from_num_days_from_ce_opt(self.day_number)
    }

    pub fn first_of_month(&self) -> Self {
        CalendarDate {
            day_number: self.day_number - (i32::from(self.day) - 1),
            day: 1,
            ..*self
        }
    }

    pub fn last_of_month(&self) -> Self {
        CalendarDate {
            day_number: self.day_number + i32::from(self.month_length - self.day),
            day: self.month_length,
            ..*self
        }
    }

    pub fn with_day(&self, day: u8) -> Result<Self, DateError> {
        if day == 0 || day > self.month_length {
            return Err(DateError::DayOutOfRange {
                day: i64::from(day),
                length: self.month_length,
            });
        }
        Ok(CalendarDate {
            day_number: self.day_number + i32::from(day) - i32::from(self.day),
            day,
            ..*self
        })
    }

    pub fn plus_days(&self, days: i32) -> Result<Self, DateError> {
        Self::from_day_number(self.chronology, self.day_number + days)
    }

    /// Moves by whole months, clamping the day to the target month's length.
    pub fn plus_months(&self, months: i32) -> Result<Self, DateError> {
        let index = self.year * 12 + i32::from(self.month) - 1 + months;
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) + 1;
        let first = Self::from_fields(self.chronology, year, i64::from(month), 1)?;
        first.with_day(self.day.min(first.month_length))
    }

    pub fn is_same_month(&self, other: &CalendarDate) -> bool {
        self.year == other.year && self.month == other.month
    }
}

impl PartialEq for CalendarDate {
    fn eq(&self, other: &Self) -> bool {
        self.day_number == other.day_number
    }
}

impl Eq for CalendarDate {}

impl PartialOrd for CalendarDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CalendarDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.day_number.cmp(&other.day_number)
    }
}

impl Hash for CalendarDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.day_number.hash(state);
    }
}

impl fmt::Debug for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CalendarDate({self} {})", self.chronology.id())
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Inclusive range of calendar years a picker is limited to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct YearRange {
    first: i32,
    last: i32,
}

impl YearRange {
    pub fn new(first: i32, last: i32) -> Result<Self, ConstructionError> {
        if first > last {
            return Err(ConstructionError::InvalidYearRange { first, last });
        }
        Ok(YearRange { first, last })
    }

    pub fn first(&self) -> i32 {
        self.first
    }

    pub fn last(&self) -> i32 {
        self.last
    }

    pub fn count(&self) -> i32 {
        self.last - self.first + 1
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.first..=self.last).contains(&year)
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.first..=self.last
    }
}

impl Default for YearRange {
    fn default() -> Self {
        YearRange {
            first: Chronology::MIN_YEAR,
            last: Chronology::MAX_YEAR,
        }
    }
}

impl TryFrom<RangeInclusive<i32>> for YearRange {
    type Error = ConstructionError;

    fn try_from(range: RangeInclusive<i32>) -> Result<Self, Self::Error> {
        YearRange::new(*range.start(), *range.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u8, d: u8) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    #[test]
    fn ordering_crosses_month_and_year_boundaries() {
        assert!(date(1445, 12, 29) < date(1446, 1, 1));
        assert!(date(1446, 1, 29) < date(1446, 2, 1));
        assert_eq!(date(1446, 1, 1).plus_days(-1).unwrap(), date(1445, 12, 1).last_of_month());
    }

    #[test]
    fn equality_ignores_chronology_tag() {
        let uq = date(1446, 3, 10);
        let same_day = CalendarDate::from_day_number(Chronology::TabularFriday, uq.day_number()).unwrap();
        assert_eq!(uq, same_day);
    }

    #[test]
    fn first_and_last_of_month() {
        let d = date(1446, 9, 17);
        let first = d.first_of_month();
        let last = d.last_of_month();
        assert_eq!(first, date(1446, 9, 1));
        assert_eq!(last.day(), d.length_of_month());
        assert_eq!(last.day_number() - first.day_number() + 1, i32::from(d.length_of_month()));
    }

    #[test]
    fn day_of_week_matches_gregorian() {
        // 1 Ramadan 1446 = Saturday 1 March 2025.
        assert_eq!(date(1446, 9, 1).day_of_week(), Weekday::Sat);
        assert_eq!(date(1446, 9, 1).to_iso(), NaiveDate::from_ymd_opt(2025, 3, 1));
    }

    #[test]
    fn plus_months_clamps_day() {
        let d = date(1446, 7, 1).last_of_month();
        let next = d.plus_months(1).unwrap();
        assert_eq!((next.year(), next.month()), (1446, 8));
        assert_eq!(next.day(), d.day().min(next.length_of_month()));

        let back = date(1446, 1, 5).plus_months(-1).unwrap();
        assert_eq!((back.year(), back.month(), back.day()), (1445, 12, 5));
    }

    #[test]
    fn min_and_max_bound_the_chronology() {
        let min = CalendarDate::min().unwrap();
        let max = CalendarDate::max().unwrap();
        assert_eq!((min.year(), min.month(), min.day()), (1300, 1, 1));
        assert_eq!((max.year(), max.month()), (1600, 12));
        assert!(min.plus_days(-1).is_err());
        assert!(max.plus_days(1).is_err());
    }

    #[test]
    fn with_day_rejects_out_of_month() {
        let d = date(1446, 9, 1);
        assert!(d.with_day(0).is_err());
        assert!(d.with_day(d.length_of_month() + 1).is_err());
        assert_eq!(d.with_day(10).unwrap(), date(1446, 9, 10));
    }

    #[test]
    fn year_range_rejects_inverted_bounds() {
        assert_eq!(
            YearRange::new(1450, 1356),
            Err(ConstructionError::InvalidYearRange { first: 1450, last: 1356 })
        );
        let range = YearRange::try_from(1356..=1450).unwrap();
        assert_eq!(range.count(), 95);
        assert!(range.contains(1356) && range.contains(1450));
        assert!(!range.contains(1451));
        assert_eq!(YearRange::default().count(), 301);
    }

    #[test]
    fn weekday_index_wraps() {
        assert_eq!(weekday_from_index(0), Weekday::Mon);
        assert_eq!(weekday_from_index(6), Weekday::Sun);
        assert_eq!(weekday_from_index(7), Weekday::Mon);
        assert_eq!(weekday_from_index(-1), Weekday::Sun);
    }
}
