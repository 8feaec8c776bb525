use chrono::{Datelike, Local, NaiveDate};
use icu::calendar::{AnyCalendar, AnyCalendarKind, Date as IcuDate};
use icu::locale::Locale;
use icu::locale::extensions::unicode::Key;
use icu_calendar::types::DateFields as IcuDateFields;

use crate::error::DateError;

/// The Hijri calculation rules a [`CalendarDate`](crate::CalendarDate) is
/// expressed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Chronology {
    /// Umm al-Qura, the official calendar of Saudi Arabia.
    #[default]
    UmmAlQura,
    /// Tabular type II, Friday epoch ("islamic-civil").
    TabularFriday,
    /// Tabular type II, Thursday epoch ("islamic-tbla").
    TabularThursday,
    /// Astronomical simulation for Mecca ("islamic-rgsa").
    SimulatedMecca,
}

/// Resolved fields of one Hijri day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HijriDay {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub month_length: u8,
    pub day_number: i32,
}

impl Chronology {
    pub const MIN_YEAR: i32 = 1300;
    pub const MAX_YEAR: i32 = 1600;

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "islamic-umalqura" => Some(Chronology::UmmAlQura),
            "islamic" | "islamic-civil" | "islamicc" => Some(Chronology::TabularFriday),
            "islamic-tbla" => Some(Chronology::TabularThursday),
            "islamic-rgsa" => Some(Chronology::SimulatedMecca),
            _ => None,
        }
    }

    /// The Hijri variant named by a locale's `-u-ca-` keyword, if any.
    pub fn from_locale(locale: &Locale) -> Option<Self> {
        let key: Key = "ca".parse().ok()?;
        let value = locale.extensions.unicode.keywords.get(&key)?.to_string();
        Self::from_id(&value)
    }

    /// BCP-47 calendar identifier.
    pub fn id(self) -> &'static str {
        match self {
            Chronology::UmmAlQura => "islamic-umalqura",
            Chronology::TabularFriday => "islamic-civil",
            Chronology::TabularThursday => "islamic-tbla",
            Chronology::SimulatedMecca => "islamic-rgsa",
        }
    }

    fn icu_kind(self) -> AnyCalendarKind {
        match self {
            Chronology::UmmAlQura => AnyCalendarKind::HijriUmmAlQura,
            Chronology::TabularFriday => AnyCalendarKind::HijriTabularTypeIIFriday,
            Chronology::TabularThursday => AnyCalendarKind::HijriTabularTypeIIThursday,
            Chronology::SimulatedMecca => AnyCalendarKind::HijriSimulatedMecca,
        }
    }

    fn calendar(self) -> AnyCalendar {
        AnyCalendar::new(self.icu_kind())
    }

    fn check_year(year: i32) -> Result<(), DateError> {
        if (Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            Ok(())
        } else {
            Err(DateError::YearOutOfBounds {
                year,
                min: Self::MIN_YEAR,
                max: Self::MAX_YEAR,
            })
        }
    }

    /// Resolves Hijri fields to a day, rejecting anything out of range rather
    /// than constraining it.
    pub(crate) fn resolve(self, year: i32, month: i64, day: i64) -> Result<HijriDay, DateError> {
        Self::check_year(year)?;
        if !(1..=12).contains(&month) {
            return Err(DateError::MonthOutOfRange(month));
        }

        let mut fields = IcuDateFields::default();
        fields.extended_year = Some(year);
        fields.ordinal_month = Some(month as u8);
        fields.day = Some(1);
        let first = IcuDate::try_from_fields(fields, Default::default(), self.calendar()).map_err(
            |_| DateError::YearOutOfBounds {
                year,
                min: Self::MIN_YEAR,
                max: Self::MAX_YEAR,
            },
        )?;

        let month_length = first.days_in_month();
        if day < 1 || day > i64::from(month_length) {
            return Err(DateError::DayOutOfRange {
                day,
                length: month_length,
            });
        }

        let iso = first.to_iso();
        let first_day_number = iso_day_number(
            iso.year().extended_year(),
            iso.month().ordinal,
            iso.day_of_month().0,
        )
        .ok_or(DateError::YearOutOfBounds {
            year,
            min: Self::MIN_YEAR,
            max: Self::MAX_YEAR,
        })?;

        Ok(HijriDay {
            year,
            month: month as u8,
            day: day as u8,
            month_length,
            day_number: first_day_number + (day as i32 - 1),
        })
    }

    /// Converts a proleptic Gregorian day count (days from 0001-01-01, which
    /// is day 1) into Hijri fields.
    pub(crate) fn fields_for_day_number(self, day_number: i32) -> Result<HijriDay, DateError> {
        let out_of_bounds = DateError::YearOutOfBounds {
            year: 0,
            min: Self::MIN_YEAR,
            max: Self::MAX_YEAR,
        };
        let iso = NaiveDate::from_num_days_from_ce_opt(day_number).ok_or(out_of_bounds.clone())?;
        let iso_date = IcuDate::try_new_iso(iso.year(), iso.month() as u8, iso.day() as u8)
            .map_err(|_| out_of_bounds)?;
        let d = iso_date.to_any().to_calendar(self.calendar());

        let year = d.year().extended_year();
        Self::check_year(year)?;
        Ok(HijriDay {
            year,
            month: d.month().ordinal,
            day: d.day_of_month().0,
            month_length: d.days_in_month(),
            day_number,
        })
    }

    pub(crate) fn today(self) -> Result<HijriDay, DateError> {
        let local = Local::now().date_naive();
        self.fields_for_day_number(local.num_days_from_ce())
    }
}

pub(crate) fn iso_day_number(year: i32, month: u8, day: u8) -> Option<i32> {
    NaiveDate::from_ymd_opt(year, u32::from(month), u32::from(day)).map(|d| d.num_days_from_ce())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_ids_round_trip() {
        for chronology in [
            Chronology::UmmAlQura,
            Chronology::TabularFriday,
            Chronology::TabularThursday,
            Chronology::SimulatedMecca,
        ] {
            assert_eq!(Chronology::from_id(chronology.id()), Some(chronology));
        }
        assert_eq!(Chronology::from_id("islamicc"), Some(Chronology::TabularFriday));
        assert_eq!(Chronology::from_id("gregory"), None);
    }

    #[test]
    fn calendar_keyword_selects_variant() {
        let locale: Locale = "ar-SA-u-ca-islamic-tbla".parse().unwrap();
        assert_eq!(Chronology::from_locale(&locale), Some(Chronology::TabularThursday));
        let plain: Locale = "ar-SA".parse().unwrap();
        assert_eq!(Chronology::from_locale(&plain), None);
        let gregorian: Locale = "en-u-ca-gregory".parse().unwrap();
        assert_eq!(Chronology::from_locale(&gregorian), None);
    }

    #[test]
    fn resolve_rejects_out_of_range_fields() {
        let c = Chronology::UmmAlQura;
        assert!(matches!(
            c.resolve(1299, 1, 1),
            Err(DateError::YearOutOfBounds { year: 1299, .. })
        ));
        assert!(matches!(
            c.resolve(1601, 1, 1),
            Err(DateError::YearOutOfBounds { year: 1601, .. })
        ));
        assert_eq!(c.resolve(1446, 13, 1), Err(DateError::MonthOutOfRange(13)));
        assert!(matches!(
            c.resolve(1446, 1, 31),
            Err(DateError::DayOutOfRange { day: 31, .. })
        ));
        assert!(matches!(
            c.resolve(1446, 1, 0),
            Err(DateError::DayOutOfRange { day: 0, .. })
        ));
    }

    #[test]
    fn ramadan_1446_starts_on_first_of_march_2025() {
        let day = Chronology::UmmAlQura.resolve(1446, 9, 1).unwrap();
        assert_eq!(Some(day.day_number), iso_day_number(2025, 3, 1));
        assert_eq!(day.month_length, 29);
    }

    #[test]
    fn day_number_round_trips_through_fields() {
        let c = Chronology::UmmAlQura;
        let day = c.resolve(1445, 12, 10).unwrap();
        assert_eq!(c.fields_for_day_number(day.day_number).unwrap(), day);
    }

    #[test]
    fn month_lengths_are_lunar() {
        for chronology in [Chronology::UmmAlQura, Chronology::TabularFriday] {
            for month in 1..=12 {
                let len = chronology.resolve(1440, month, 1).unwrap().month_length;
                assert!(len == 29 || len == 30, "{chronology:?} month {month} has {len} days");
            }
        }
    }
}
