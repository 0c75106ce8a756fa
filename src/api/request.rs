//! Query-string types for the ledger API.
//!
//! Request bodies are the store inputs themselves ([`crate::store::NewEmployee`],
//! [`crate::store::NewLeaveRequest`], [`crate::store::LeaveRequestPatch`]) and
//! `GET /leave-requests` reads a [`crate::store::LeaveFilter`] directly.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::store::HolidayFilter;

/// Query for `GET /holidays`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolidayQuery {
    /// Region to list; every region when absent or blank.
    #[serde(default)]
    pub region: Option<String>,
    /// Calendar year; every year when absent or blank.
    #[serde(default, deserialize_with = "crate::store::blank_as_none")]
    pub year: Option<i32>,
}

impl HolidayQuery {
    /// The store filter for this query.
    pub fn into_filter(self) -> HolidayFilter {
        let region = self
            .region
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        HolidayFilter {
            region,
            year: self.year,
        }
    }
}

/// Query for `GET /reports/:employee_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Calendar year to report on; the current year when absent or blank.
    #[serde(default, deserialize_with = "crate::store::blank_as_none")]
    pub year: Option<i32>,
}

impl ReportQuery {
    /// The requested year, or the current UTC year.
    pub fn year_or_current(&self) -> i32 {
        self.year.unwrap_or_else(|| Utc::now().year())
    }
}
