//! Retention filter compiler.
//!
//! Turns "now" plus the names that already exist into the ordered list of
//! time buckets to retain: hourly buckets for the last 24 hours, daily buckets
//! for the 30 days before that, and monthly buckets for the 119 months before
//! that. Buckets never overlap.
//!
//! Existing names are only consulted to choose between a fine-grained batch
//! and a single coarser bucket for a partially covered period. They never
//! change which period is covered.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike};
use std::iter;
use tracing::trace;

use crate::calendar::{YearMonth, fifteenth_of_previous_month};
use crate::filter::{Filter, any_match};

/// Hourly buckets, counted back from now.
pub const HOURLY_SLOTS: usize = 24;

/// Daily buckets following the hourly window.
pub const DAILY_SLOTS: u32 = 30;

/// Monthly buckets following the daily window.
pub const MONTHLY_SLOTS: usize = 119;

/// The daily window starts this many days before today.
pub const DAILY_WINDOW_OFFSET_DAYS: u64 = 2;

/// Daily filters plus the month at which the monthly family takes over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyFilters {
    pub filters: Vec<Filter>,
    pub handoff: YearMonth,
}

/// Compile the complete, ordered filter list for `now`.
pub fn compile_filters<S: AsRef<str>>(now: NaiveDateTime, existing: &[S]) -> Vec<Filter> {
    let mut filters = hourly_filters(now, existing);

    let Some(start) = now.date().checked_sub_days(Days::new(DAILY_WINDOW_OFFSET_DAYS)) else {
        return filters;
    };
    let daily = daily_filters(start, existing);
    filters.extend(daily.filters);
    filters.extend(monthly_filters(daily.handoff, MONTHLY_SLOTS));

    trace!(now = %now, count = filters.len(), "Compiled retention filters");
    filters
}

/// Hourly buckets for today, topped up from yesterday to 24 slots.
pub fn hourly_filters<S: AsRef<str>>(now: NaiveDateTime, existing: &[S]) -> Vec<Filter> {
    let mut filters = filters_for_today(now);
    let remaining = HOURLY_SLOTS.saturating_sub(filters.len());
    filters.extend(filters_for_yesterday(now, remaining, existing));
    filters
}

/// One bucket per hour of the current day, from the current hour back to 00.
pub fn filters_for_today(now: NaiveDateTime) -> Vec<Filter> {
    let today = now.date();
    (0..=now.hour())
        .rev()
        .map(|hour| Filter::hour_of(today, hour))
        .collect()
}

/// The last `remaining` hours of yesterday, or yesterday as a single daily
/// bucket when none of those hours holds an entry.
pub fn filters_for_yesterday<S: AsRef<str>>(
    now: NaiveDateTime,
    remaining: usize,
    existing: &[S],
) -> Vec<Filter> {
    let Some(yesterday) = now.date().pred_opt() else {
        return Vec::new();
    };
    let hourly = (0..remaining.min(HOURLY_SLOTS))
        .map(|i| Filter::hour_of(yesterday, 23 - i as u32))
        .collect();
    choose_granularity(hourly, Filter::day(yesterday), existing)
}

/// Daily buckets for the 30 days ending at `start`.
///
/// Days of `start`'s own month are always pinned. The remainder spills into
/// the previous month and, when that month is shorter than the remainder,
/// into the month before it. A month that is only partially inside the window
/// is probed: its days are kept as daily buckets only if at least one of them
/// holds an entry, otherwise the whole month becomes one monthly bucket.
///
/// A start on the 31st probes all 30 days of its own month.
pub fn daily_filters<S: AsRef<str>>(start: NaiveDate, existing: &[S]) -> DailyFilters {
    let m0 = YearMonth::of(start);
    let m1 = YearMonth::of(fifteenth_of_previous_month(start));
    let m2 = m1.pred();
    let day = start.day();

    if day > DAILY_SLOTS {
        debug_assert_eq!(m0.days(), day, "start day beyond the end of its month");
        return DailyFilters {
            filters: probe_days(start, DAILY_SLOTS, m0, existing),
            handoff: m1,
        };
    }

    let mut filters = days_back(start, day);
    let remainder = DAILY_SLOTS - day;
    if remainder == 0 {
        return DailyFilters { filters, handoff: m1 };
    }

    let m1_days = m1.days();
    let handoff = if remainder < m1_days {
        filters.extend(probe_days(m1.ultimo(), remainder, m1, existing));
        m2
    } else {
        filters.extend(days_back(m1.ultimo(), m1_days));
        let rest = remainder - m1_days;
        if rest == 0 {
            m2
        } else {
            filters.extend(probe_days(m2.ultimo(), rest, m2, existing));
            m2.pred()
        }
    };

    DailyFilters { filters, handoff }
}

/// `count` monthly buckets starting at `from` and walking back in time.
pub fn monthly_filters(from: YearMonth, count: usize) -> Vec<Filter> {
    iter::successors(Some(from), |month| Some(month.pred()))
        .take(count)
        .map(Filter::month)
        .collect()
}

/// Keep the fine-grained batch if any existing name falls into it, otherwise
/// fall back to the single coarse bucket.
pub fn choose_granularity<S: AsRef<str>>(
    fine: Vec<Filter>,
    coarse: Filter,
    existing: &[S],
) -> Vec<Filter> {
    if any_match(existing, &fine) {
        fine
    } else {
        trace!(coarse = %coarse, replaced = fine.len(), "No entries in fine buckets, using coarse bucket");
        vec![coarse]
    }
}

fn days_back(last: NaiveDate, count: u32) -> Vec<Filter> {
    iter::successors(Some(last), |date| date.pred_opt())
        .take(count as usize)
        .map(Filter::day)
        .collect()
}

fn probe_days<S: AsRef<str>>(
    last: NaiveDate,
    count: u32,
    month: YearMonth,
    existing: &[S],
) -> Vec<Filter> {
    choose_granularity(days_back(last, count), Filter::month(month), existing)
}
