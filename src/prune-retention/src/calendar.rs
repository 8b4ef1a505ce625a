//! Calendar helpers used by the filter compiler.
//!
//! Everything here is pure. Month stepping is done on plain year/month pairs
//! because date arithmetic on the 29th-31st drifts across short months.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use std::fmt;

/// A calendar month, formatted as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month), "month out of range: {month}");
        Self { year, month }
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// The month before this one, rolling over into the previous year.
    pub fn pred(self) -> Self {
        if self.month <= 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    pub fn days(self) -> u32 {
        days_in_month(self.year, self.month)
    }

    /// Last day of this month.
    pub fn ultimo(self) -> NaiveDate {
        last_day_of_month(self.year, self.month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Last day of the given month.
pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Number of days in the given month (28-31).
pub fn days_in_month(year: i32, month: u32) -> u32 {
    last_day_of_month(year, month).day()
}

/// The 15th of the month before `date`'s month.
///
/// Mid-month anchors keep month stepping away from the day-31 edge.
pub fn fifteenth_of_previous_month(date: NaiveDate) -> NaiveDate {
    date.with_day(15)
        .and_then(|mid| mid.checked_sub_months(Months::new(1)))
        .unwrap_or(NaiveDate::MIN)
}

/// `YYYY-MM-DD_HH`
pub fn format_hour(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d_%H").to_string()
}

/// `YYYY-MM-DD_HH` for an explicit hour of `date`.
pub fn format_day_hour(date: NaiveDate, hour: u32) -> String {
    format!("{}_{:02}", format_day(date), hour)
}

/// `YYYY-MM-DD`
pub fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 1), 31);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
    }

    #[test]
    fn test_last_day_of_month_december() {
        assert_eq!(last_day_of_month(2023, 12), date(2023, 12, 31));
    }

    #[test]
    fn test_fifteenth_of_previous_month() {
        assert_eq!(fifteenth_of_previous_month(date(2024, 3, 31)), date(2024, 2, 15));
        assert_eq!(fifteenth_of_previous_month(date(2024, 1, 1)), date(2023, 12, 15));
        assert_eq!(fifteenth_of_previous_month(date(2023, 3, 29)), date(2023, 2, 15));
    }

    #[test]
    fn test_year_month_pred_rolls_over() {
        assert_eq!(YearMonth::new(2024, 1).pred(), YearMonth::new(2023, 12));
        assert_eq!(YearMonth::new(2024, 7).pred(), YearMonth::new(2024, 6));
    }

    #[test]
    fn test_formatting_is_zero_padded() {
        assert_eq!(YearMonth::new(2024, 3).to_string(), "2024-03");
        assert_eq!(format_day(date(2024, 3, 1)), "2024-03-01");
        assert_eq!(format_day_hour(date(2024, 3, 1), 7), "2024-03-01_07");
        let at = date(2024, 3, 1).and_hms_opt(9, 54, 21).unwrap();
        assert_eq!(format_hour(at), "2024-03-01_09");
    }
}
