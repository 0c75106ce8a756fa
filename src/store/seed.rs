//! Default dataset used when no usable snapshot exists.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Employee, Holiday, LeaveRequest, LeaveStatus, LeaveType, Role};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

#[allow(clippy::too_many_arguments)]
fn employee(
    id: &str,
    first_name: &str,
    last_name: &str,
    team: &str,
    role: Role,
    allowance_days: i64,
    carryover_days: i64,
    timezone: &str,
    start_date: NaiveDate,
) -> Employee {
    Employee {
        id: id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!("{}@company.com", first_name.to_lowercase()),
        team: team.to_string(),
        role,
        allowance_days: Decimal::from(allowance_days),
        carryover_days: Decimal::from(carryover_days),
        timezone: timezone.to_string(),
        active: true,
        start_date,
    }
}

/// Seed employees.
pub fn employees() -> Vec<Employee> {
    vec![
        employee(
            "emp-ava",
            "Ava",
            "Lopez",
            "Engineering",
            Role::Employee,
            22,
            2,
            "America/Los_Angeles",
            date(2022, 3, 14),
        ),
        employee(
            "emp-noah",
            "Noah",
            "Patel",
            "Design",
            Role::Employee,
            20,
            0,
            "America/New_York",
            date(2021, 8, 1),
        ),
        employee(
            "emp-mia",
            "Mia",
            "Chen",
            "People",
            Role::Admin,
            25,
            3,
            "Europe/London",
            date(2020, 1, 10),
        ),
    ]
}

/// Seed `US` holidays for `year`.
pub fn holidays(year: i32) -> Vec<Holiday> {
    [
        ("hol-new-year", 1, 1, "New Year's Day"),
        ("hol-independence", 7, 4, "Independence Day"),
        ("hol-thanksgiving", 11, 27, "Thanksgiving"),
        ("hol-christmas", 12, 25, "Christmas Day"),
    ]
    .into_iter()
    .map(|(id, month, day, name)| Holiday {
        id: id.to_string(),
        region: "US".to_string(),
        date: date(year, month, day),
        name: name.to_string(),
    })
    .collect()
}

/// Seed approved leave requests dated in `year`.
pub fn leave_requests(year: i32) -> Vec<LeaveRequest> {
    [
        ("vac-ava-summer", "emp-ava", (6, 10), (6, 14), LeaveType::Annual, "Summer holiday"),
        ("vac-noah-sick", "emp-noah", (7, 2), (7, 3), LeaveType::Sick, "Flu"),
        ("vac-mia-winter", "emp-mia", (12, 22), (12, 31), LeaveType::Annual, "Winter break"),
    ]
    .into_iter()
    .map(|(id, employee_id, start, end, leave_type, notes)| LeaveRequest {
        id: id.to_string(),
        employee_id: employee_id.to_string(),
        start_date: date(year, start.0, start.1),
        end_date: date(year, end.0, end.1),
        leave_type,
        status: LeaveStatus::Approved,
        notes: notes.to_string(),
    })
    .collect()
}
