//! Annual usage reports.
//!
//! A report counts the approved leave an employee took in one calendar year
//! and compares it with their entitlement. A request belongs to the year its
//! `start_date` falls in and counts every one of its inclusive days there, even
//! when it runs past December 31.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::LedgerResult;
use crate::models::{Employee, EmployeeSummary, LeaveRequest, LeaveStatus, Report};
use crate::store::{LeaveFilter, LedgerStore};

/// Builds the report for `employee` from their approved leave requests.
///
/// Requests that do not start in `year` are dropped; the rest are kept in
/// start-date order. `requests` is expected to hold approved requests of this
/// employee only.
///
/// # Example
///
/// ```
/// use leave_ledger::calculation::summarize_usage;
/// use leave_ledger::models::{Employee, LeaveRequest, LeaveStatus, LeaveType, Role};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "emp-ava".to_string(),
///     first_name: "Ava".to_string(),
///     last_name: "Lopez".to_string(),
///     email: "ava@company.com".to_string(),
///     team: "Engineering".to_string(),
///     role: Role::Employee,
///     allowance_days: Decimal::from(22),
///     carryover_days: Decimal::from(2),
///     timezone: "America/Los_Angeles".to_string(),
///     active: true,
///     start_date: NaiveDate::from_ymd_opt(2022, 3, 14).unwrap(),
/// };
/// let summer = LeaveRequest {
///     id: "vac-1".to_string(),
///     employee_id: "emp-ava".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
///     leave_type: LeaveType::Annual,
///     status: LeaveStatus::Approved,
///     notes: String::new(),
/// };
///
/// let report = summarize_usage(&employee, vec![summer], 2024);
/// assert_eq!(report.days_taken, 5);
/// assert_eq!(report.remaining, Decimal::from(19));
/// assert_eq!(report.by_type[&LeaveType::Annual], 5);
/// ```
pub fn summarize_usage(employee: &Employee, requests: Vec<LeaveRequest>, year: i32) -> Report {
    let mut vacations: Vec<LeaveRequest> = requests
        .into_iter()
        .filter(|request| request.start_date.year() == year)
        .collect();
    vacations.sort_by_key(|request| request.start_date);

    let mut by_type = BTreeMap::new();
    let mut days_taken = 0;
    for request in &vacations {
        let days = request.days();
        days_taken += days;
        *by_type.entry(request.leave_type).or_insert(0) += days;
    }

    let allowance = employee.total_allowance();
    let remaining = (allowance - Decimal::from(days_taken)).max(Decimal::ZERO);

    Report {
        employee: EmployeeSummary {
            id: employee.id.clone(),
            name: employee.full_name(),
            email: employee.email.clone(),
            allowance,
            carryover: employee.carryover_days,
        },
        year,
        days_taken,
        remaining,
        by_type,
        vacations,
    }
}

/// Reports on one employee's approved leave in `year`.
///
/// Returns `Ok(None)` when no employee has `employee_id`; store failures
/// propagate.
pub async fn compute_report(
    store: &dyn LedgerStore,
    employee_id: &str,
    year: i32,
) -> LedgerResult<Option<Report>> {
    let Some(employee) = store.get_employee(employee_id).await? else {
        debug!(employee_id, year, "report requested for unknown employee");
        return Ok(None);
    };

    let filter = LeaveFilter::for_employee(employee_id).with_status(LeaveStatus::Approved);
    let requests = store.list_leave_requests(&filter).await?;
    let report = summarize_usage(&employee, requests, year);

    debug!(
        employee_id,
        year,
        days_taken = report.days_taken,
        remaining = %report.remaining,
        "report computed"
    );
    Ok(Some(report))
}
