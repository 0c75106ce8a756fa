//! Core data models for the leave ledger.
//!
//! This module contains the records the ledger stores (employees, leave
//! requests, holidays) and the report it derives from them.

mod employee;
mod holiday;
mod leave_request;
mod report;

pub(crate) use employee::lenient_days;
pub use employee::{DEFAULT_ALLOWANCE_DAYS, DEFAULT_CARRYOVER_DAYS, Employee, Role};
pub use holiday::Holiday;
pub use leave_request::{LeaveRequest, LeaveStatus, LeaveType, UnknownLabel};
pub use report::{EmployeeSummary, Report};
