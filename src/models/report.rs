//! Annual usage report consumed by the view layer.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{LeaveRequest, LeaveType};

/// Denormalized employee details carried on a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    /// Employee identifier.
    pub id: String,
    /// "first last".
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Allowance plus carryover.
    #[serde(with = "rust_decimal::serde::float")]
    pub allowance: Decimal,
    /// Carryover alone.
    #[serde(with = "rust_decimal::serde::float")]
    pub carryover: Decimal,
}

/// Per-employee, per-year leave usage.
///
/// Fully re-derivable from employee and leave request records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// The employee the report covers.
    pub employee: EmployeeSummary,
    /// The calendar year reported on.
    pub year: i32,
    /// Inclusive days of approved leave starting in `year`.
    pub days_taken: i64,
    /// `max(allowance - days_taken, 0)`.
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining: Decimal,
    /// Days taken per leave type; only types actually used appear.
    pub by_type: BTreeMap<LeaveType, i64>,
    /// The approved requests counted, ordered by start date.
    pub vacations: Vec<LeaveRequest>,
}
