//! HTTP API module for the leave ledger.
//!
//! This module exposes the ledger as a JSON REST API: employees, leave
//! requests, holidays and annual reports. The same dialect is spoken by
//! [`crate::store::RemoteLedger`], so one ledger service can back another.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{HolidayQuery, ReportQuery};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
