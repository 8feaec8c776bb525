use std::collections::BTreeSet;

use tracing::trace;

use crate::date::CalendarDate;

/// How clicks on day cells change the selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    #[default]
    Single,
    Range,
    Multiple,
}

/// What the user has picked so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Single(CalendarDate),
    /// A range under construction or complete; `start <= end` always holds.
    Range {
        start: CalendarDate,
        end: Option<CalendarDate>,
    },
    Multiple(BTreeSet<CalendarDate>),
}

impl Selection {
    /// Start and end of a range. A single selection is reported as its start.
    pub fn endpoints(&self) -> (Option<CalendarDate>, Option<CalendarDate>) {
        match self {
            Selection::Single(date) => (Some(*date), None),
            Selection::Range { start, end } => (Some(*start), *end),
            Selection::None | Selection::Multiple(_) => (None, None),
        }
    }

    pub fn is_selected(&self, date: &CalendarDate) -> bool {
        match self {
            Selection::None => false,
            Selection::Single(d) => d == date,
            Selection::Range { start, end } => start == date || end.as_ref() == Some(date),
            Selection::Multiple(dates) => dates.contains(date),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Selection::None => true,
            Selection::Multiple(dates) => dates.is_empty(),
            _ => false,
        }
    }

    /// Complete range, if both ends have been picked.
    pub fn selected_range(&self) -> Option<(CalendarDate, CalendarDate)> {
        match self {
            Selection::Range {
                start,
                end: Some(end),
            } => Some((*start, *end)),
            _ => None,
        }
    }

    pub fn selected_dates(&self) -> Vec<CalendarDate> {
        match self {
            Selection::None => Vec::new(),
            Selection::Single(d) => vec![*d],
            Selection::Range { start, end } => std::iter::once(*start).chain(*end).collect(),
            Selection::Multiple(dates) => dates.iter().copied().collect(),
        }
    }

    /// Applies a click on `date`.
    ///
    /// In range mode a click starts a new range when nothing or a complete
    /// range is selected, closes the range when it falls on or after the
    /// start, and otherwise restarts the range from the earlier date.
    pub fn select(&mut self, date: CalendarDate, mode: SelectionMode) {
        let next = match (mode, std::mem::take(self)) {
            (SelectionMode::Single, _) => Selection::Single(date),
            (SelectionMode::Range, Selection::Range { start, end: None }) if date >= start => {
                Selection::Range {
                    start,
                    end: Some(date),
                }
            }
            (SelectionMode::Range, _) => Selection::Range { start: date, end: None },
            (SelectionMode::Multiple, Selection::Multiple(mut dates)) => {
                if !dates.remove(&date) {
                    dates.insert(date);
                }
                Selection::Multiple(dates)
            }
            (SelectionMode::Multiple, _) => Selection::Multiple(BTreeSet::from([date])),
        };
        trace!(?mode, %date, selection = ?next, "selection changed");
        *self = next;
    }

    /// Replaces a range from typed input. An end before the start is dropped.
    pub fn set_range(&mut self, start: Option<CalendarDate>, end: Option<CalendarDate>) {
        *self = match (start, end) {
            (Some(start), end) => Selection::Range {
                start,
                end: end.filter(|e| *e >= start),
            },
            (None, _) => Selection::None,
        };
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u8, d: u8) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    #[test]
    fn single_mode_replaces() {
        let mut s = Selection::None;
        s.select(date(1446, 1, 1), SelectionMode::Single);
        s.select(date(1446, 1, 2), SelectionMode::Single);
        assert_eq!(s, Selection::Single(date(1446, 1, 2)));
        assert_eq!(s.endpoints(), (Some(date(1446, 1, 2)), None));
    }

    #[test]
    fn range_clicks_follow_start_end_rule() {
        let mut s = Selection::None;
        s.select(date(1446, 5, 10), SelectionMode::Range);
        assert_eq!(s.endpoints(), (Some(date(1446, 5, 10)), None));

        // Earlier click restarts the range.
        s.select(date(1446, 5, 3), SelectionMode::Range);
        assert_eq!(s.endpoints(), (Some(date(1446, 5, 3)), None));

        s.select(date(1446, 6, 1), SelectionMode::Range);
        assert_eq!(s.selected_range(), Some((date(1446, 5, 3), date(1446, 6, 1))));

        // Third click on a complete range starts over.
        s.select(date(1446, 7, 1), SelectionMode::Range);
        assert_eq!(s.endpoints(), (Some(date(1446, 7, 1)), None));
    }

    #[test]
    fn same_day_closes_range() {
        let mut s = Selection::None;
        s.select(date(1446, 5, 10), SelectionMode::Range);
        s.select(date(1446, 5, 10), SelectionMode::Range);
        assert_eq!(s.selected_range(), Some((date(1446, 5, 10), date(1446, 5, 10))));
    }

    #[test]
    fn multiple_mode_toggles() {
        let mut s = Selection::None;
        s.select(date(1446, 1, 1), SelectionMode::Multiple);
        s.select(date(1446, 1, 5), SelectionMode::Multiple);
        assert!(s.is_selected(&date(1446, 1, 1)));
        s.select(date(1446, 1, 1), SelectionMode::Multiple);
        assert!(!s.is_selected(&date(1446, 1, 1)));
        assert_eq!(s.selected_dates(), vec![date(1446, 1, 5)]);
        s.select(date(1446, 1, 5), SelectionMode::Multiple);
        assert!(s.is_empty());
    }

    #[test]
    fn set_range_drops_inverted_end() {
        let mut s = Selection::None;
        s.set_range(Some(date(1446, 3, 10)), Some(date(1446, 3, 1)));
        assert_eq!(s.endpoints(), (Some(date(1446, 3, 10)), None));
        s.set_range(None, Some(date(1446, 3, 1)));
        assert_eq!(s, Selection::None);
    }
}
