use chrono::Weekday;

use crate::calendar_math::{DAYS_IN_WEEK, days_from_week_start_to_first_of_month};
use crate::date::CalendarDate;

/// A cell position in the month grid: `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridCoordinates {
    pub x: usize,
    pub y: usize,
}

impl GridCoordinates {
    fn from_offset(offset: usize) -> Self {
        GridCoordinates {
            x: offset % DAYS_IN_WEEK,
            y: offset / DAYS_IN_WEEK,
        }
    }
}

/// Where a selected range starts and ends within one displayed month, for
/// drawing the range highlight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectedRangeInfo {
    pub grid_start: GridCoordinates,
    pub grid_end: GridCoordinates,
    /// False when the range began in an earlier month and is clipped here.
    pub first_is_selection_start: bool,
    /// False when the range continues into a later month.
    pub last_is_selection_end: bool,
}

impl SelectedRangeInfo {
    /// `None` when the range does not touch `displayed_month`.
    pub fn calculate(
        displayed_month: &CalendarDate,
        start: &CalendarDate,
        end: &CalendarDate,
        first_day_of_week: Weekday,
    ) -> Option<Self> {
        let month_start = displayed_month.first_of_month();
        let month_end = displayed_month.last_of_month();
        if start > &month_end || end < &month_start {
            return None;
        }

        let first_is_selection_start = start >= &month_start;
        let last_is_selection_end = end <= &month_end;
        let lead = days_from_week_start_to_first_of_month(displayed_month, first_day_of_week);

        let start_offset = if first_is_selection_start {
            lead + usize::from(start.day()) - 1
        } else {
            lead
        };
        let end_offset = if last_is_selection_end {
            lead + usize::from(end.day()) - 1
        } else {
            lead + usize::from(month_end.day()) - 1
        };

        Some(SelectedRangeInfo {
            grid_start: GridCoordinates::from_offset(start_offset),
            grid_end: GridCoordinates::from_offset(end_offset),
            first_is_selection_start,
            last_is_selection_end,
        })
    }
}
