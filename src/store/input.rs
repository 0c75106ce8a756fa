//! Input records for create and update operations.
//!
//! Each input is validated and resolved into a complete stored record before
//! anything is persisted. Absent fields resolve as follows.
//!
//! | Input | Field | Default |
//! |---|---|---|
//! | [`NewEmployee`] | `first_name` | `"New"` |
//! | | `last_name` | `"Employee"` |
//! | | `email` | `employee-<unix millis>@example.com` |
//! | | `team` | `"General"` |
//! | | `role` | `employee` |
//! | | `allowance_days` | configured default (20) |
//! | | `carryover_days` | configured default (0) |
//! | | `timezone` | configured default |
//! | | `active` | `true` |
//! | | `start_date` | today |
//! | [`NewLeaveRequest`] | `employee_id` | required |
//! | | `start_date` | required |
//! | | `end_date` | `start_date` |
//! | | `type` | `ANNUAL` |
//! | | `status` | `APPROVED` |
//! | | `notes` | `""` |
//!
//! Text fields are trimmed and blank text counts as absent.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::normalize;
use crate::config::DefaultsConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{lenient_days, Employee, LeaveRequest, LeaveStatus, LeaveType, Role};

/// Fields for creating an employee. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Team label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Annual allowance; numeric text is accepted, anything unusable is ignored.
    #[serde(
        default,
        deserialize_with = "lenient_days",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub allowance_days: Option<Decimal>,
    /// Carryover; numeric text is accepted, anything unusable is ignored.
    #[serde(
        default,
        deserialize_with = "lenient_days",
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub carryover_days: Option<Decimal>,
    /// IANA timezone label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Whether the employee is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl NewEmployee {
    /// Resolves every absent field and returns the complete record.
    pub fn into_employee(self, id: String, defaults: &DefaultsConfig) -> Employee {
        let now = Utc::now();
        Employee {
            id,
            first_name: text_or(self.first_name, "New"),
            last_name: text_or(self.last_name, "Employee"),
            email: non_blank(self.email)
                .unwrap_or_else(|| format!("employee-{}@example.com", now.timestamp_millis())),
            team: text_or(self.team, "General"),
            role: self.role.unwrap_or_default(),
            allowance_days: self.allowance_days.unwrap_or(defaults.allowance_days),
            carryover_days: self.carryover_days.unwrap_or(defaults.carryover_days),
            timezone: text_or(self.timezone, &defaults.timezone),
            active: self.active.unwrap_or(true),
            start_date: self.start_date.unwrap_or_else(|| now.date_naive()),
        }
    }
}

/// Fields for creating a leave request.
///
/// `employee_id` and `start_date` are required; see [`NewLeaveRequest::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLeaveRequest {
    /// The employee taking the leave.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    /// First day of leave.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Last day of leave; defaults to `start_date`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Kind of leave.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub leave_type: Option<LeaveType>,
    /// Status label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LeaveStatus>,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewLeaveRequest {
    /// A request for `employee_id` covering `start..=end`.
    pub fn new(employee_id: impl Into<String>, start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self {
            employee_id: Some(employee_id.into()),
            start_date: Some(start),
            end_date: end,
            ..Self::default()
        }
    }

    /// Checks required fields without consuming the input.
    pub fn validate(&self) -> LedgerResult<()> {
        self.required_fields().map(|_| ())
    }

    /// Validates, normalizes the dates, and returns the complete record.
    ///
    /// # Example
    ///
    /// ```
    /// use leave_ledger::store::NewLeaveRequest;
    /// use chrono::NaiveDate;
    ///
    /// let june_10 = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    /// let june_14 = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
    ///
    /// let request = NewLeaveRequest::new("emp-ava", june_14, Some(june_10))
    ///     .into_leave_request("vac-1".to_string())
    ///     .unwrap();
    /// assert_eq!((request.start_date, request.end_date), (june_10, june_14));
    /// ```
    pub fn into_leave_request(self, id: String) -> LedgerResult<LeaveRequest> {
        let (employee_id, start) = self.required_fields()?;
        let (start_date, end_date) = normalize(start, self.end_date);
        Ok(LeaveRequest {
            id,
            employee_id,
            start_date,
            end_date,
            leave_type: self.leave_type.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
        })
    }

    fn required_fields(&self) -> LedgerResult<(String, NaiveDate)> {
        let employee_id = non_blank(self.employee_id.clone())
            .ok_or_else(|| LedgerError::validation("employee_id", "an employee is required"))?;
        let start = self
            .start_date
            .ok_or_else(|| LedgerError::validation("start_date", "a start date is required"))?;
        Ok((employee_id, start))
    }
}

/// Partial update for a leave request. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequestPatch {
    /// New employee reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    /// New first day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// New last day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// New leave type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub leave_type: Option<LeaveType>,
    /// New status label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LeaveStatus>,
    /// New notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LeaveRequestPatch {
    /// Checks the patch on its own, before any record is looked up.
    pub fn validate(&self) -> LedgerResult<()> {
        match &self.employee_id {
            Some(id) if id.trim().is_empty() => Err(LedgerError::validation(
                "employee_id",
                "an employee reference cannot be blank",
            )),
            _ => Ok(()),
        }
    }

    /// Merges the patch onto `existing` and re-normalizes the merged dates.
    pub fn apply(self, existing: &LeaveRequest) -> LedgerResult<LeaveRequest> {
        self.validate()?;
        let start = self.start_date.unwrap_or(existing.start_date);
        let end = self.end_date.unwrap_or(existing.end_date);
        let (start_date, end_date) = normalize(start, Some(end));
        Ok(LeaveRequest {
            id: existing.id.clone(),
            employee_id: self
                .employee_id
                .map(|id| id.trim().to_string())
                .unwrap_or_else(|| existing.employee_id.clone()),
            start_date,
            end_date,
            leave_type: self.leave_type.unwrap_or(existing.leave_type),
            status: self.status.unwrap_or(existing.status),
            notes: self.notes.unwrap_or_else(|| existing.notes.clone()),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn text_or(value: Option<String>, default: &str) -> String {
    non_blank(value).unwrap_or_else(|| default.to_string())
}
