//! Time-bucket filters.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

use crate::calendar::{YearMonth, format_day, format_day_hour, format_hour};

/// Width of the time bucket a filter stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Hour,
    Day,
    Month,
}

/// A retained time bucket, matched against entry names by string prefix.
///
/// Within one bucket only the newest matching entry survives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Filter {
    prefix: String,
    granularity: Granularity,
}

impl Filter {
    /// Bucket for the hour containing `at`.
    pub fn hour(at: NaiveDateTime) -> Self {
        Self {
            prefix: format_hour(at),
            granularity: Granularity::Hour,
        }
    }

    /// Bucket for hour `hour` of `date`.
    pub fn hour_of(date: NaiveDate, hour: u32) -> Self {
        Self {
            prefix: format_day_hour(date, hour),
            granularity: Granularity::Hour,
        }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self {
            prefix: format_day(date),
            granularity: Granularity::Day,
        }
    }

    pub fn month(month: YearMonth) -> Self {
        Self {
            prefix: month.to_string(),
            granularity: Granularity::Month,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn matches(&self, name: &str) -> bool {
        name.starts_with(&self.prefix)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)
    }
}

/// True if any of `names` falls into any of `filters`.
pub fn any_match<S: AsRef<str>>(names: &[S], filters: &[Filter]) -> bool {
    names
        .iter()
        .any(|name| filters.iter().any(|f| f.matches(name.as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_prefixes() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 7).unwrap();
        assert_eq!(Filter::hour_of(date, 3).prefix(), "2024-06-07_03");
        assert_eq!(Filter::day(date).prefix(), "2024-06-07");
        assert_eq!(Filter::month(YearMonth::of(date)).prefix(), "2024-06");
        assert_eq!(
            Filter::hour(date.and_hms_opt(23, 59, 0).unwrap()).granularity(),
            Granularity::Hour
        );
    }

    #[test]
    fn test_filter_matches_by_prefix_only() {
        let filter = Filter::month(YearMonth::new(2024, 6));
        assert!(filter.matches("2024-06-17_09-49"));
        assert!(filter.matches("2024-06"));
        assert!(!filter.matches("2024-07-01_00-00"));
        assert!(!filter.matches("x2024-06-17"));
    }

    #[test]
    fn test_any_match() {
        let filters = vec![Filter::day(NaiveDate::from_ymd_opt(2024, 6, 7).unwrap())];
        assert!(any_match(&["2024-06-07_10-00", "other"], &filters));
        assert!(!any_match(&["2024-06-08_10-00"], &filters));
        assert!(!any_match::<&str>(&[], &filters));
    }
}
