//! Leave request model and its enumerations.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculation::{inclusive_days, DateRange};

/// The kind of leave being taken.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveType {
    /// Paid annual leave, counted against the allowance.
    #[default]
    Annual,
    /// Sick leave.
    Sick,
    /// Unpaid leave.
    Unpaid,
    /// Parental leave.
    Parental,
    /// Time off in lieu of overtime worked.
    CompTime,
    /// Anything else.
    Other,
}

impl LeaveType {
    /// Every leave type, in declaration order.
    pub const ALL: [LeaveType; 6] = [
        LeaveType::Annual,
        LeaveType::Sick,
        LeaveType::Unpaid,
        LeaveType::Parental,
        LeaveType::CompTime,
        LeaveType::Other,
    ];

    /// Returns the boundary label (e.g., "COMP_TIME").
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Annual => "ANNUAL",
            LeaveType::Sick => "SICK",
            LeaveType::Unpaid => "UNPAID",
            LeaveType::Parental => "PARENTAL",
            LeaveType::CompTime => "COMP_TIME",
            LeaveType::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaveType {
    type Err = UnknownLabel;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        LeaveType::ALL
            .into_iter()
            .find(|t| t.as_str() == label)
            .ok_or_else(|| UnknownLabel(label.to_string()))
    }
}

/// A boundary label that names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown label '{0}'")]
pub struct UnknownLabel(pub String);

/// Where a leave request stands. Only [`LeaveStatus::Approved`] counts toward usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    /// Approved leave.
    #[default]
    Approved,
    /// Awaiting a decision.
    Pending,
    /// Declined.
    Rejected,
    /// Withdrawn by the employee.
    Cancelled,
}

impl LeaveStatus {
    /// Every status, in declaration order.
    pub const ALL: [LeaveStatus; 4] = [
        LeaveStatus::Approved,
        LeaveStatus::Pending,
        LeaveStatus::Rejected,
        LeaveStatus::Cancelled,
    ];

    /// Returns the boundary label (e.g., "APPROVED").
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Approved => "APPROVED",
            LeaveStatus::Pending => "PENDING",
            LeaveStatus::Rejected => "REJECTED",
            LeaveStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaveStatus {
    type Err = UnknownLabel;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        LeaveStatus::ALL
            .into_iter()
            .find(|s| s.as_str() == label)
            .ok_or_else(|| UnknownLabel(label.to_string()))
    }
}

/// A stored leave request.
///
/// Records produced by the store always satisfy `start_date <= end_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the request.
    pub id: String,
    /// The employee taking the leave. Not enforced as a foreign key.
    pub employee_id: String,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Kind of leave.
    #[serde(rename = "type", default)]
    pub leave_type: LeaveType,
    /// Approval status label.
    #[serde(default)]
    pub status: LeaveStatus,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

impl LeaveRequest {
    /// Inclusive number of days covered, never negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_ledger::models::{LeaveRequest, LeaveStatus, LeaveType};
    /// use chrono::NaiveDate;
    ///
    /// let request = LeaveRequest {
    ///     id: "vac-1".to_string(),
    ///     employee_id: "emp-ava".to_string(),
    ///     start_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
    ///     leave_type: LeaveType::Annual,
    ///     status: LeaveStatus::Approved,
    ///     notes: String::new(),
    /// };
    /// assert_eq!(request.days(), 5);
    /// ```
    pub fn days(&self) -> i64 {
        inclusive_days(self.start_date, self.end_date)
    }

    /// The normalized range covered by this request.
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, Some(self.end_date))
    }
}
