//! The ledger store: persistence and retrieval of employees, leave requests
//! and holidays.
//!
//! [`LedgerStore`] is the single interface every consumer uses. It has two
//! implementations, [`RemoteLedger`] and [`LocalSnapshotLedger`], and
//! [`open_ledger`] picks one from configuration once at startup. Consumers
//! receive the store as an `Arc<dyn LedgerStore>`; there is no global
//! instance.

mod filter;
mod input;
mod local;
mod query_gate;
mod remote;
mod seed;
mod snapshot;
mod storage;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Employee, Holiday, LeaveRequest};

pub use filter::{HolidayFilter, LeaveFilter};
pub(crate) use filter::blank_as_none;
pub use input::{LeaveRequestPatch, NewEmployee, NewLeaveRequest};
pub use local::{LocalSnapshotLedger, LocalSnapshotLedgerBuilder};
pub use query_gate::{LatestResult, QueryGate, QueryTicket};
pub use remote::RemoteLedger;
pub use snapshot::{Recovery, Snapshot};
pub use storage::{FileStorage, MemoryStorage, SnapshotStorage};

/// Persistence interface for the ledger.
///
/// Every read returns owned copies; mutating a returned record never affects
/// stored state. Update and delete report a missing id through their return
/// value rather than an error.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// All employees, ordered by first name then last name.
    async fn list_employees(&self) -> LedgerResult<Vec<Employee>>;

    /// The employee with `id`, if any.
    async fn get_employee(&self, id: &str) -> LedgerResult<Option<Employee>>;

    /// The employee with `id`, escalating absence to [`LedgerError::NotFound`].
    async fn require_employee(&self, id: &str) -> LedgerResult<Employee> {
        self.get_employee(id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Employee", id))
    }

    /// Creates an employee, filling absent fields with defaults.
    async fn create_employee(&self, input: NewEmployee) -> LedgerResult<Employee>;

    /// Deletes an employee. Returns false if no employee has `id`.
    async fn delete_employee(&self, id: &str) -> LedgerResult<bool>;

    /// Leave requests matching `filter`, ordered by start date.
    async fn list_leave_requests(&self, filter: &LeaveFilter) -> LedgerResult<Vec<LeaveRequest>>;

    /// The leave request with `id`, if any.
    async fn get_leave_request(&self, id: &str) -> LedgerResult<Option<LeaveRequest>>;

    /// Validates and creates a leave request with normalized dates.
    async fn create_leave_request(&self, input: NewLeaveRequest) -> LedgerResult<LeaveRequest>;

    /// Merges `patch` onto the leave request with `id`. Returns `None` if absent.
    async fn update_leave_request(
        &self,
        id: &str,
        patch: LeaveRequestPatch,
    ) -> LedgerResult<Option<LeaveRequest>>;

    /// Deletes a leave request. Returns false if no request has `id`.
    async fn delete_leave_request(&self, id: &str) -> LedgerResult<bool>;

    /// Holidays matching `filter`, ordered by date.
    async fn list_holidays(&self, filter: &HolidayFilter) -> LedgerResult<Vec<Holiday>>;

    /// Replaces the whole dataset with the default seed.
    async fn reset(&self) -> LedgerResult<()>;
}

/// Builds the backend selected by `config`.
///
/// The remote backend is used when both its URL and key are configured;
/// otherwise the local snapshot backend is used, on disk when a snapshot
/// directory is configured and in memory when not.
pub fn open_ledger(config: &LedgerConfig) -> LedgerResult<Arc<dyn LedgerStore>> {
    if config.remote.is_configured() {
        let ledger = RemoteLedger::from_config(&config.remote, config.employee_deletion)?;
        info!(base_url = %ledger.base_url(), "using remote ledger backend");
        return Ok(Arc::new(ledger));
    }

    if config.remote.base_url.is_some() || config.remote.api_key.is_some() {
        warn!("remote backend needs both base_url and api_key; falling back to local snapshot");
    }

    let storage: Arc<dyn SnapshotStorage> = match &config.snapshot.directory {
        Some(directory) => {
            info!(directory = %directory.display(), "using local snapshot backend");
            Arc::new(FileStorage::new(directory))
        }
        None => {
            info!("using in-memory snapshot backend");
            Arc::new(MemoryStorage::new())
        }
    };

    let ledger = LocalSnapshotLedger::builder(storage)
        .key(config.snapshot.key.clone())
        .defaults(config.defaults.clone())
        .employee_deletion(config.employee_deletion)
        .open();
    Ok(Arc::new(ledger))
}
