// src/date_range.rs

use chrono::NaiveDate;
use std::fmt;

use crate::error::{Error, Result};

/// Compact date format used in URLs and file names.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// A single day or an inclusive span of days.
///
/// `to` is `None` for a single day; a span whose ends coincide is stored as
/// a single day so that naming and URL selection only ever look at `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    from: NaiveDate,
    to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: Option<NaiveDate>) -> Result<Self> {
        match to {
            Some(to) if to < from => Err(Error::InvalidInput(format!(
                "date from {} is after date to {}",
                from.format(DATE_FORMAT),
                to.format(DATE_FORMAT)
            ))),
            Some(to) if to == from => Ok(Self { from, to: None }),
            to => Ok(Self { from, to }),
        }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self { from: day, to: None }
    }

    pub fn date_from(&self) -> NaiveDate {
        self.from
    }

    pub fn date_to(&self) -> Option<NaiveDate> {
        self.to
    }

    /// Last day covered, which is `from` for a single-day range.
    pub fn last(&self) -> NaiveDate {
        self.to.unwrap_or(self.from)
    }

    /// Every day in the range, ascending, both ends included.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last();
        self.from.iter_days().take_while(move |d| *d <= last)
    }

    pub fn len_days(&self) -> usize {
        (self.last() - self.from).num_days() as usize + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to {
            Some(to) => write!(
                f,
                "{}-{}",
                self.from.format(DATE_FORMAT),
                to.format(DATE_FORMAT)
            ),
            None => write!(f, "{}", self.from.format(DATE_FORMAT)),
        }
    }
}

/// `<label>_<YYYYMMDD>.csv` for one day, `<label>_<YYYYMMDD>-<YYYYMMDD>.csv` for a span.
pub fn make_report_name(source_label: &str, range: &DateRange) -> String {
    format!("{}_{}.csv", source_label, range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn equal_ends_collapse_to_single_day() {
        let r = DateRange::new(d(2024, 1, 1), Some(d(2024, 1, 1))).unwrap();
        assert_eq!(r.date_to(), None);
        assert_eq!(r, DateRange::single(d(2024, 1, 1)));
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = DateRange::new(d(2024, 1, 3), Some(d(2024, 1, 1))).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn days_are_inclusive_and_ordered() {
        let r = DateRange::new(d(2024, 2, 27), Some(d(2024, 3, 1))).unwrap();
        let days: Vec<_> = r.days().collect();
        assert_eq!(
            days,
            vec![d(2024, 2, 27), d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1)]
        );
        assert_eq!(r.len_days(), 4);
        assert_eq!(DateRange::single(d(2024, 1, 1)).days().count(), 1);
    }

    #[test]
    fn report_name_for_single_day() {
        let r = DateRange::single(d(2024, 1, 1));
        let name = make_report_name("wielkosci_podstawowe", &r);
        assert_eq!(name, "wielkosci_podstawowe_20240101.csv");
        // the only '-' would be the date separator
        assert!(!name.contains('-'));
    }

    #[test]
    fn report_name_for_span() {
        let r = DateRange::new(d(2024, 1, 1), Some(d(2024, 1, 3))).unwrap();
        let name = make_report_name("kontrakty_godzinowe", &r);
        assert_eq!(name, "kontrakty_godzinowe_20240101-20240103.csv");
        assert!(name.contains("20240101-20240103"));
    }

    #[test]
    fn report_name_is_deterministic() {
        let r = DateRange::new(d(2023, 12, 30), Some(d(2024, 1, 2))).unwrap();
        let first = make_report_name("x", &r);
        for _ in 0..5 {
            assert_eq!(make_report_name("x", &r), first);
        }
        let rebuilt = DateRange::new(r.date_from(), r.date_to()).unwrap();
        assert_eq!(make_report_name("x", &rebuilt), first);
    }
}
