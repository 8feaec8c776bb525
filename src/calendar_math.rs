//! Paging and month-grid arithmetic.
//!
//! A picker pages through months; every (year, month) pair inside a
//! [`YearRange`] maps to exactly one page index and back. A month is laid out
//! in a fixed grid of [`MAX_CALENDAR_ROWS`] rows by [`DAYS_IN_WEEK`] columns.

use chrono::Weekday;

use crate::date::{CalendarDate, YearRange, weekday_from_index};
use crate::error::DateError;
use crate::selectable::SelectableDates;
use crate::selection::Selection;

pub const DAYS_IN_WEEK: usize = 7;
pub const MAX_CALENDAR_ROWS: usize = 6;
pub const GRID_CELLS: usize = DAYS_IN_WEEK * MAX_CALENDAR_ROWS;

/// First day of the month shown on `page`. The page is not checked against
/// the range; a page outside it yields a year outside it.
pub fn date_from_page(page: i32, year_range: &YearRange) -> Result<CalendarDate, DateError> {
    let year = year_range.first() + page.div_euclid(12);
    let month = page.rem_euclid(12) + 1;
    CalendarDate::new(year, month as u8, 1)
}

pub fn page_from_date(date: &CalendarDate, year_range: &YearRange) -> i32 {
    (date.year() - year_range.first()) * 12 + i32::from(date.month()) - 1
}

pub fn total_pages(year_range: &YearRange) -> i32 {
    year_range.count() * 12
}

/// Number of blank cells before day 1 when weeks start on `first_day_of_week`.
pub fn days_from_week_start_to_first_of_month(
    displayed_month: &CalendarDate,
    first_day_of_week: Weekday,
) -> usize {
    let day_index = displayed_month.first_of_month().day_of_week().num_days_from_monday() as i32;
    let start_index = first_day_of_week.num_days_from_monday() as i32;
    (day_index - start_index + 7).rem_euclid(7) as usize
}

/// The seven weekdays in header order.
pub fn weekday_order(first_day_of_week: Weekday) -> [Weekday; DAYS_IN_WEEK] {
    let start = first_day_of_week.num_days_from_monday() as i32;
    std::array::from_fn(|i| weekday_from_index(start + i as i32))
}

/// Per-day presentation flags for one occupied grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayCell {
    pub date: CalendarDate,
    pub is_today: bool,
    pub selected: bool,
    pub in_range: bool,
    pub enabled: bool,
}

/// A month laid out in the 6 x 7 grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthGrid {
    first: CalendarDate,
    leading_blanks: usize,
}

impl MonthGrid {
    pub fn new(displayed_month: &CalendarDate, first_day_of_week: Weekday) -> Self {
        MonthGrid {
            first: displayed_month.first_of_month(),
            leading_blanks: days_from_week_start_to_first_of_month(displayed_month, first_day_of_week),
        }
    }

    pub fn leading_blanks(&self) -> usize {
        self.leading_blanks
    }

    pub fn month_length(&self) -> usize {
        usize::from(self.first.length_of_month())
    }

    pub fn trailing_blanks(&self) -> usize {
        GRID_CELLS - self.leading_blanks - self.month_length()
    }

    /// Day of month shown in cell `index`, `None` for a blank cell.
    pub fn day_at(&self, index: usize) -> Option<u8> {
        let lead = self.leading_blanks;
        if index >= lead && index < lead + self.month_length() && index < GRID_CELLS {
            Some((index - lead + 1) as u8)
        } else {
            None
        }
    }

    pub fn cells(&self) -> [Option<u8>; GRID_CELLS] {
        std::array::from_fn(|i| self.day_at(i))
    }

    pub fn rows(&self) -> impl Iterator<Item = [Option<u8>; DAYS_IN_WEEK]> + '_ {
        (0..MAX_CALENDAR_ROWS)
            .map(move |row| std::array::from_fn(|col| self.day_at(row * DAYS_IN_WEEK + col)))
    }

    /// Flags for every occupied cell, in grid order.
    pub fn day_cells(
        &self,
        today: Option<&CalendarDate>,
        selection: &Selection,
        selectable: &dyn SelectableDates,
    ) -> Vec<DayCell> {
        let (start, end) = selection.endpoints();
        (0..self.first.length_of_month())
            .filter_map(|offset| self.first.with_day(offset + 1).ok())
            .map(|date| {
                let in_range = match (start, end) {
                    (Some(s), Some(e)) => s <= date && date <= e,
                    _ => false,
                };
                DayCell {
                    date,
                    is_today: today == Some(&date),
                    selected: selection.is_selected(&date),
                    in_range,
                    enabled: selectable.is_selectable_year(date.year())
                        && selectable.is_selectable_date(&date),
                }
            })
            .collect()
    }
}
