//! Calendar-month partitioning of the archive's year range
//!
//! The event listing endpoint caps each response at a few hundred events, so
//! the archiver never asks for more than one month at a time. This module
//! turns an inclusive year range into the ordered month ranges that drive the
//! run.

use chrono::{Datelike, Days, NaiveDate};

use crate::types::DateRange;

/// Split `[Jan 1 year_from, Jan 1 (year_to + 1))` into calendar-month ranges
///
/// Ranges are half-open, chronological, and tile the span exactly: each
/// range's `end` is the following range's `start`. Advancing jumps 32 days
/// forward and truncates to the first of the landed-on month, which clears
/// any month length (28 to 31 days) without ever skipping one.
///
/// An inverted range (`year_from > year_to`) produces no output.
#[must_use]
pub fn month_ranges(year_from: i32, year_to: i32) -> Vec<DateRange> {
    let Some(overall_start) = NaiveDate::from_ymd_opt(year_from, 1, 1) else {
        return Vec::new();
    };
    let Some(overall_end) = year_to
        .checked_add(1)
        .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
    else {
        return Vec::new();
    };

    let mut ranges = Vec::new();
    let mut start = overall_start;
    while start < overall_end {
        let landed = start + Days::new(32);
        let next_start = first_of_month(landed);
        ranges.push(DateRange {
            start,
            end: next_start,
        });
        start = next_start;
    }
    ranges
}

/// Truncate a date to the first day of its month
fn first_of_month(date: NaiveDate) -> NaiveDate {
    // day 1 is valid for every (year, month)
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}
