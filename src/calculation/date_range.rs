//! Date-range normalization and inclusive day accounting.
//!
//! Every creation and update path in the ledger orders its dates through
//! [`normalize`]; day counts everywhere come from [`inclusive_days`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Orders a `(start, end)` pair, defaulting an absent end to the start.
///
/// # Example
///
/// ```
/// use leave_ledger::calculation::normalize;
/// use chrono::NaiveDate;
///
/// let june_10 = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
/// let june_14 = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
///
/// assert_eq!(normalize(june_14, Some(june_10)), (june_10, june_14));
/// assert_eq!(normalize(june_10, None), (june_10, june_10));
/// ```
pub fn normalize(start: NaiveDate, end: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    let end = end.unwrap_or(start);
    if start <= end {
        (start, end)
    } else {
        (end, start)
    }
}

/// Returns `(end - start) + 1` in whole days, clamped to a minimum of 0.
///
/// The dates are not reordered: a reversed pair counts as 0 days.
///
/// # Example
///
/// ```
/// use leave_ledger::calculation::inclusive_days;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
///
/// assert_eq!(inclusive_days(start, end), 4);
/// assert_eq!(inclusive_days(start, start), 1);
/// assert_eq!(inclusive_days(end, start), 0);
/// ```
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    ((end - start).num_days() + 1).max(0)
}

/// Parses an ISO `YYYY-MM-DD` date, ignoring surrounding whitespace.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Inclusive day count between two textual dates; malformed input yields 0.
///
/// # Example
///
/// ```
/// use leave_ledger::calculation::inclusive_days_between;
///
/// assert_eq!(inclusive_days_between("2024-06-10", "2024-06-14"), 5);
/// assert_eq!(inclusive_days_between("2024-06-10", "not a date"), 0);
/// ```
pub fn inclusive_days_between(start: &str, end: &str) -> i64 {
    match (parse_date(start), parse_date(end)) {
        (Some(start), Some(end)) => inclusive_days(start, end),
        _ => 0,
    }
}

/// An ordered, inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Builds a normalized range; see [`normalize`].
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        let (start, end) = normalize(start, end);
        Self { start, end }
    }

    /// First day of the range.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive number of days in the range (at least 1).
    pub fn days(&self) -> i64 {
        inclusive_days(self.start, self.end)
    }

    /// Returns true if `date` lies within the range, endpoints included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Overlap test against optional bounds.
    ///
    /// Matches when `end >= from` and `start <= to`; an absent bound imposes
    /// nothing on its side.
    pub fn overlaps(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
        from.is_none_or(|from| self.end >= from) && to.is_none_or(|to| self.start <= to)
    }
}
