use std::sync::Arc;

use chrono::Weekday;
use tracing::trace;

use crate::calendar_math::{DayCell, MonthGrid, date_from_page, page_from_date, total_pages};
use crate::date::{CalendarDate, YearRange};
use crate::error::StateError;
use crate::range::SelectedRangeInfo;
use crate::selectable::SelectableDates;
use crate::selection::{Selection, SelectionMode};

/// Whether the picker shows the calendar grid or the text input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    #[default]
    Picker,
    Input,
}

/// One entry of the year picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearItem {
    pub year: i32,
    /// The displayed month's year.
    pub selected: bool,
    pub current: bool,
    pub enabled: bool,
}

/// The state a date picker keeps between user interactions.
pub struct PickerState {
    year_range: YearRange,
    displayed_month: CalendarDate,
    selection: Selection,
    selection_mode: SelectionMode,
    display_mode: DisplayMode,
    selectable: Arc<dyn SelectableDates>,
}

impl PickerState {
    /// `initial_month` defaults to the current month and must fall inside
    /// `year_range`.
    pub fn new(
        year_range: YearRange,
        initial_month: Option<CalendarDate>,
        selection_mode: SelectionMode,
        selectable: Arc<dyn SelectableDates>,
    ) -> Result<Self, StateError> {
        let month = match initial_month {
            Some(month) => month,
            None => CalendarDate::today()?,
        };
        check_in_range(&year_range, &month)?;
        Ok(PickerState {
            year_range,
            displayed_month: month.first_of_month(),
            selection: Selection::None,
            selection_mode,
            display_mode: DisplayMode::default(),
            selectable,
        })
    }

    pub fn year_range(&self) -> YearRange {
        self.year_range
    }

    pub fn displayed_month(&self) -> CalendarDate {
        self.displayed_month
    }

    pub fn set_displayed_month(&mut self, month: CalendarDate) -> Result<(), StateError> {
        check_in_range(&self.year_range, &month)?;
        self.displayed_month = month.first_of_month();
        Ok(())
    }

    pub fn current_page(&self) -> i32 {
        page_from_date(&self.displayed_month, &self.year_range)
    }

    pub fn page_count(&self) -> i32 {
        total_pages(&self.year_range)
    }

    pub fn set_page(&mut self, page: i32) -> Result<(), StateError> {
        let month = date_from_page(page, &self.year_range)?;
        self.set_displayed_month(month)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection_mode
    }

    pub fn is_enabled(&self, date: &CalendarDate) -> bool {
        self.year_range.contains(date.year())
            && self.selectable.is_selectable_year(date.year())
            && self.selectable.is_selectable_date(date)
    }

    /// Applies a click on a day cell. Clicks on disabled days are ignored
    /// and return false.
    pub fn select(&mut self, date: CalendarDate) -> bool {
        if !self.is_enabled(&date) {
            trace!(%date, "ignored click on disabled date");
            return false;
        }
        self.selection.select(date, self.selection_mode);
        true
    }

    /// Replaces the selection with dates accepted from text input.
    pub fn set_selection_from_input(&mut self, start: Option<CalendarDate>, end: Option<CalendarDate>) {
        match self.selection_mode {
            SelectionMode::Range => self.selection.set_range(start, end),
            SelectionMode::Single | SelectionMode::Multiple => match start {
                Some(date) => self.selection.select(date, SelectionMode::Single),
                None => self.selection.clear(),
            },
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
    }

    pub fn toggle_display_mode(&mut self) -> DisplayMode {
        self.display_mode = match self.display_mode {
            DisplayMode::Picker => DisplayMode::Input,
            DisplayMode::Input => DisplayMode::Picker,
        };
        self.display_mode
    }

    pub fn month_grid(&self, first_day_of_week: Weekday) -> MonthGrid {
        MonthGrid::new(&self.displayed_month, first_day_of_week)
    }

    pub fn day_cells(&self, today: Option<&CalendarDate>, first_day_of_week: Weekday) -> Vec<DayCell> {
        self.month_grid(first_day_of_week)
            .day_cells(today, &self.selection, self.selectable.as_ref())
    }

    /// Highlight geometry of the completed range for the displayed month.
    pub fn selected_range_info(&self, first_day_of_week: Weekday) -> Option<SelectedRangeInfo> {
        let (start, end) = self.selection.selected_range()?;
        SelectedRangeInfo::calculate(&self.displayed_month, &start, &end, first_day_of_week)
    }

    /// Every year of the range for the year picker.
    pub fn year_items(&self, current_year: i32) -> Vec<YearItem> {
        self.year_range
            .years()
            .map(|year| YearItem {
                year,
                selected: year == self.displayed_month.year(),
                current: year == current_year,
                enabled: self.selectable.is_selectable_year(year),
            })
            .collect()
    }
}

fn check_in_range(year_range: &YearRange, date: &CalendarDate) -> Result<(), StateError> {
    if year_range.contains(date.year()) {
        Ok(())
    } else {
        Err(StateError::OutOfYearRange {
            year: date.year(),
            first: year_range.first(),
            last: year_range.last(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selectable::{AllDates, ExcludedDates};

    fn date(y: i32, m: u8, d: u8) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    fn state(mode: SelectionMode) -> PickerState {
        PickerState::new(
            YearRange::new(1440, 1450).unwrap(),
            Some(date(1446, 9, 17)),
            mode,
            Arc::new(AllDates),
        )
        .unwrap()
    }

    #[test]
    fn displayed_month_must_be_in_range() {
        let err = PickerState::new(
            YearRange::new(1440, 1450).unwrap(),
            Some(date(1451, 1, 1)),
            SelectionMode::Single,
            Arc::new(AllDates),
        )
        .err();
        assert_eq!(
            err,
            Some(StateError::OutOfYearRange {
                year: 1451,
                first: 1440,
                last: 1450
            })
        );

        let mut s = state(SelectionMode::Single);
        assert_eq!(s.displayed_month(), date(1446, 9, 1));
        assert!(s.set_displayed_month(date(1439, 12, 1)).is_err());
        assert_eq!(s.displayed_month(), date(1446, 9, 1));
    }

    #[test]
    fn paging_moves_displayed_month() {
        let mut s = state(SelectionMode::Single);
        assert_eq!(s.current_page(), 6 * 12 + 8);
        assert_eq!(s.page_count(), 132);
        s.set_page(0).unwrap();
        assert_eq!(s.displayed_month(), date(1440, 1, 1));
        s.set_page(131).unwrap();
        assert_eq!(s.displayed_month(), date(1450, 12, 1));
        assert!(matches!(s.set_page(132), Err(StateError::OutOfYearRange { year: 1451, .. })));
        assert!(s.set_page(-1).is_err());
    }

    #[test]
    fn disabled_dates_ignore_clicks() {
        let mut s = PickerState::new(
            YearRange::new(1440, 1450).unwrap(),
            Some(date(1446, 9, 1)),
            SelectionMode::Range,
            Arc::new(ExcludedDates::default().with_years([1447])),
        )
        .unwrap();
        assert!(!s.select(date(1447, 1, 1)));
        assert!(s.selection().is_empty());
        assert!(s.select(date(1446, 9, 3)));
        assert!(s.select(date(1446, 9, 10)));
        let info = s.selected_range_info(Weekday::Sat).unwrap();
        assert!(info.first_is_selection_start && info.last_is_selection_end);
        let cells = s.day_cells(None, Weekday::Sat);
        assert!(cells[5].in_range);
    }

    #[test]
    fn display_mode_toggles() {
        let mut s = state(SelectionMode::Single);
        assert_eq!(s.display_mode(), DisplayMode::Picker);
        assert_eq!(s.toggle_display_mode(), DisplayMode::Input);
        assert_eq!(s.toggle_display_mode(), DisplayMode::Picker);
        s.set_display_mode(DisplayMode::Input);
        assert_eq!(s.display_mode(), DisplayMode::Input);
    }

    #[test]
    fn input_selection_respects_mode() {
        let mut range = state(SelectionMode::Range);
        range.set_selection_from_input(Some(date(1446, 1, 1)), Some(date(1446, 2, 1)));
        assert_eq!(range.selection().selected_range(), Some((date(1446, 1, 1), date(1446, 2, 1))));

        let mut single = state(SelectionMode::Single);
        single.set_selection_from_input(Some(date(1446, 1, 1)), None);
        assert_eq!(single.selection(), &Selection::Single(date(1446, 1, 1)));
        single.set_selection_from_input(None, None);
        assert_eq!(single.selection(), &Selection::None);
    }

    #[test]
    fn year_items_flag_displayed_current_and_enabled() {
        let s = PickerState::new(
            YearRange::new(1444, 1447).unwrap(),
            Some(date(1446, 1, 1)),
            SelectionMode::Single,
            Arc::new(ExcludedDates::default().with_years([1447])),
        )
        .unwrap();
        let items = s.year_items(1445);
        assert_eq!(items.len(), 4);
        assert_eq!(
            items[2],
            YearItem {
                year: 1446,
                selected: true,
                current: false,
                enabled: true
            }
        );
        assert!(items[1].current && !items[1].selected);
        assert!(!items[3].enabled);
    }
}
