//! Keep/discard classification of entry names against compiled filters.

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::filter::Filter;

/// Leading `YYYY-MM-DD`, ASCII digits only.
static DATE_SHAPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("valid date regex"));

/// Result of classifying one directory listing.
///
/// `keep`, `discard` and `ignored` partition the input; `nonconforming` is a
/// diagnostic subset of `keep` and `discard`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Newest entry of every bucket that has one.
    pub keep: Vec<String>,
    /// Older entries of a bucket, plus date-shaped entries beyond the horizon.
    pub discard: Vec<String>,
    /// Entries that are not date-shaped. Never touched.
    pub ignored: Vec<String>,
    /// Date-shaped entries whose date is not a real calendar date, so their
    /// byte order may not be chronological.
    pub nonconforming: Vec<String>,
}

/// True for names that start with `YYYY-MM-DD`.
pub fn is_date_shaped(name: &str) -> bool {
    DATE_SHAPED.is_match(name)
}

/// True if the leading `YYYY-MM-DD` of a date-shaped name is a real date.
pub fn has_valid_date(name: &str) -> bool {
    name.get(..10)
        .is_some_and(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").is_ok())
}

/// Sort names byte-wise, newest (greatest) first.
pub fn sort_descending(names: &mut [String]) {
    names.sort_unstable_by(|a, b| b.as_bytes().cmp(a.as_bytes()));
}

/// Partition `names` into keep/discard/ignored.
///
/// `names` must be sorted descending (see [`sort_descending`]): the first
/// entry seen for a filter is the newest and is kept, every later one is
/// discarded. Date-shaped entries matching no filter are discarded too.
pub fn classify<S: AsRef<str>>(names: &[S], filters: &[Filter]) -> Classification {
    let mut result = Classification::default();
    let mut claimed = vec![false; filters.len()];

    for name in names.iter().map(AsRef::as_ref) {
        if !is_date_shaped(name) {
            debug!(name, "Skipping entry not in date format");
            result.ignored.push(name.to_string());
            continue;
        }

        if !has_valid_date(name) {
            warn!(name, "Entry name is date-shaped but not a valid date");
            result.nonconforming.push(name.to_string());
        }

        match filters.iter().position(|f| f.matches(name)) {
            Some(idx) if !claimed[idx] => {
                claimed[idx] = true;
                result.keep.push(name.to_string());
            }
            Some(_) => result.discard.push(name.to_string()),
            None => {
                debug!(name, "Entry is older than the retention horizon");
                result.discard.push(name.to_string());
            }
        }
    }

    result
}
