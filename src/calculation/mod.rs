//! Leave arithmetic for the ledger.
//!
//! This module contains the date-range normalizer that every write path runs
//! its dates through, inclusive day counting, and the annual usage report
//! built on top of them.

mod date_range;
mod report;

pub use date_range::{inclusive_days, inclusive_days_between, normalize, parse_date, DateRange};
pub use report::{compute_report, summarize_usage};
