use chrono::Weekday;
use rustc_hash::FxHashSet;

use crate::date::CalendarDate;

/// Decides which dates and years a picker lets the user choose.
///
/// Both methods default to allowing everything. Disabled dates still render,
/// greyed out, and are refused by input validation.
pub trait SelectableDates: Send + Sync {
    fn is_selectable_date(&self, _date: &CalendarDate) -> bool {
        true
    }

    fn is_selectable_year(&self, _year: i32) -> bool {
        true
    }
}

/// Every date and year is selectable.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllDates;

impl SelectableDates for AllDates {}

/// Exclusion rules combined with OR: a date matching any rule is disabled.
///
/// Only the excluded years affect [`is_selectable_year`]; excluding all twelve
/// months does not mark the year itself unselectable.
///
/// [`is_selectable_year`]: SelectableDates::is_selectable_year
#[derive(Clone, Debug, Default)]
pub struct ExcludedDates {
    dates: FxHashSet<CalendarDate>,
    weekdays: FxHashSet<Weekday>,
    months: FxHashSet<u8>,
    years: FxHashSet<i32>,
}

impl ExcludedDates {
    pub fn with_dates(mut self, dates: impl IntoIterator<Item = CalendarDate>) -> Self {
        self.dates.extend(dates);
        self
    }

    pub fn with_weekdays(mut self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        self.weekdays.extend(weekdays);
        self
    }

    /// Hijri months of year, 1 to 12.
    pub fn with_months(mut self, months: impl IntoIterator<Item = u8>) -> Self {
        self.months.extend(months);
        self
    }

    pub fn with_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years.extend(years);
        self
    }
}

impl SelectableDates for ExcludedDates {
    fn is_selectable_date(&self, date: &CalendarDate) -> bool {
        !(self.dates.contains(date)
            || self.weekdays.contains(&date.day_of_week())
            || self.months.contains(&date.month())
            || self.years.contains(&date.year()))
    }

    fn is_selectable_year(&self, year: i32) -> bool {
        !self.years.contains(&year)
    }
}

impl<F> SelectableDates for F
where
    F: Fn(&CalendarDate) -> bool + Send + Sync,
{
    fn is_selectable_date(&self, date: &CalendarDate) -> bool {
        self(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u8, d: u8) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    #[test]
    fn all_dates_allows_everything() {
        assert!(AllDates.is_selectable_date(&date(1446, 1, 1)));
        assert!(AllDates.is_selectable_year(1300));
    }

    #[test]
    fn each_rule_disables_independently() {
        let eid = date(1446, 10, 1);
        let policy = ExcludedDates::default()
            .with_dates([eid])
            .with_weekdays([Weekday::Fri])
            .with_months([9])
            .with_years([1447]);

        assert!(!policy.is_selectable_date(&eid));
        assert!(!policy.is_selectable_date(&date(1446, 9, 10)));
        assert!(!policy.is_selectable_date(&date(1447, 1, 1)));

        let friday = (1..=7)
            .map(|d| date(1446, 11, d))
            .find(|d| d.day_of_week() == Weekday::Fri)
            .unwrap();
        assert!(!policy.is_selectable_date(&friday));
        assert!(policy.is_selectable_date(&friday.plus_days(1).unwrap()));
    }

    #[test]
    fn year_selectability_only_consults_years() {
        let policy = ExcludedDates::default()
            .with_months(1..=12)
            .with_years([1450]);
        assert!(policy.is_selectable_year(1446));
        assert!(!policy.is_selectable_year(1450));
        assert!(!policy.is_selectable_date(&date(1446, 5, 5)));
    }

    #[test]
    fn closures_are_date_policies() {
        let only_first = |d: &CalendarDate| d.day() == 1;
        assert!(only_first.is_selectable_date(&date(1446, 2, 1)));
        assert!(!only_first.is_selectable_date(&date(1446, 2, 2)));
        assert!(only_first.is_selectable_year(1446));
    }
}
