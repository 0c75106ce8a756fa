//! Local snapshot backend.
//!
//! The whole dataset lives in memory and is written back to a
//! [`SnapshotStorage`] as one blob after every mutation. Loading never fails:
//! anything unusable in storage is replaced by the seed dataset and logged.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::{DefaultsConfig, EmployeeDeletion, DEFAULT_SNAPSHOT_KEY};
use crate::error::{LedgerError, LedgerResult};
use crate::ids::new_id;
use crate::models::{Employee, Holiday, LeaveRequest};

use super::filter::{sort_employees, sort_holidays, sort_leave_requests};
use super::snapshot::Snapshot;
use super::storage::SnapshotStorage;
use super::{
    HolidayFilter, LeaveFilter, LeaveRequestPatch, LedgerStore, NewEmployee, NewLeaveRequest,
};

/// Ledger backed by a locally persisted snapshot.
///
/// All writes are serialized through one lock and each one replaces the
/// stored blob, so a single instance must own a given key.
pub struct LocalSnapshotLedger {
    storage: Arc<dyn SnapshotStorage>,
    key: String,
    defaults: DefaultsConfig,
    deletion: EmployeeDeletion,
    seed_year: i32,
    state: Mutex<Snapshot>,
}

/// Builder for [`LocalSnapshotLedger`].
pub struct LocalSnapshotLedgerBuilder {
    storage: Arc<dyn SnapshotStorage>,
    key: String,
    defaults: DefaultsConfig,
    deletion: EmployeeDeletion,
    seed_year: i32,
}

impl LocalSnapshotLedgerBuilder {
    /// Storage key of the snapshot blob.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Defaults applied to new employees.
    pub fn defaults(mut self, defaults: DefaultsConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Effect of deleting an employee on their leave requests.
    pub fn employee_deletion(mut self, deletion: EmployeeDeletion) -> Self {
        self.deletion = deletion;
        self
    }

    /// Year the seed dataset is dated in. Defaults to the current year.
    pub fn seed_year(mut self, year: i32) -> Self {
        self.seed_year = year;
        self
    }

    /// Loads the snapshot from storage and returns the ledger.
    pub fn open(self) -> LocalSnapshotLedger {
        let state = load_snapshot(self.storage.as_ref(), &self.key, self.seed_year);
        LocalSnapshotLedger {
            storage: self.storage,
            key: self.key,
            defaults: self.defaults,
            deletion: self.deletion,
            seed_year: self.seed_year,
            state: Mutex::new(state),
        }
    }
}

fn load_snapshot(storage: &dyn SnapshotStorage, key: &str, seed_year: i32) -> Snapshot {
    let raw = match storage.read(key) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(key, error = %err, "snapshot storage unreadable; reinitialising from seed");
            return Snapshot::seed(seed_year);
        }
    };

    if raw.is_none() {
        info!(key, "no stored snapshot; starting from seed");
    }

    let (snapshot, recoveries) = Snapshot::recover(raw.as_deref(), seed_year);
    for recovery in &recoveries {
        warn!(key, recovery = %recovery, "replaced stored snapshot data with seed");
    }
    snapshot
}

impl LocalSnapshotLedger {
    /// Starts building a ledger over `storage`.
    pub fn builder(storage: Arc<dyn SnapshotStorage>) -> LocalSnapshotLedgerBuilder {
        LocalSnapshotLedgerBuilder {
            storage,
            key: DEFAULT_SNAPSHOT_KEY.to_string(),
            defaults: DefaultsConfig::default(),
            deletion: EmployeeDeletion::default(),
            seed_year: Utc::now().year(),
        }
    }

    /// Opens a ledger over `storage` with default settings.
    pub fn open(storage: Arc<dyn SnapshotStorage>) -> Self {
        Self::builder(storage).open()
    }

    /// A copy of the complete current dataset.
    pub async fn snapshot(&self) -> Snapshot {
        self.state.lock().await.clone()
    }

    /// Applies `change` to a copy of the state, persists the copy, then
    /// commits it. `change` returns `None` when there is nothing to change;
    /// nothing is written in that case.
    async fn mutate<T>(
        &self,
        change: impl FnOnce(&mut Snapshot) -> LedgerResult<Option<T>>,
    ) -> LedgerResult<Option<T>> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let Some(outcome) = change(&mut next)? else {
            return Ok(None);
        };
        self.persist(&next).await?;
        *state = next;
        Ok(Some(outcome))
    }

    /// Writes `snapshot` on the blocking pool; storage backends do plain
    /// file IO.
    async fn persist(&self, snapshot: &Snapshot) -> LedgerResult<()> {
        let storage_error = |message: String| LedgerError::Storage {
            key: self.key.clone(),
            message,
        };
        let blob = serde_json::to_string(snapshot).map_err(|e| storage_error(e.to_string()))?;
        let bytes = blob.len();

        let storage = Arc::clone(&self.storage);
        let key = self.key.clone();
        tokio::task::spawn_blocking(move || storage.write(&key, &blob))
            .await
            .map_err(|e| storage_error(e.to_string()))?
            .map_err(|e| storage_error(e.to_string()))?;
        debug!(key = %self.key, bytes, "snapshot persisted");
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for LocalSnapshotLedger {
    async fn list_employees(&self) -> LedgerResult<Vec<Employee>> {
        let mut employees = self.state.lock().await.employees.clone();
        sort_employees(&mut employees);
        Ok(employees)
    }

    async fn get_employee(&self, id: &str) -> LedgerResult<Option<Employee>> {
        let state = self.state.lock().await;
        Ok(state.employees.iter().find(|e| e.id == id).cloned())
    }

    async fn create_employee(&self, input: NewEmployee) -> LedgerResult<Employee> {
        let employee = input.into_employee(new_id(), &self.defaults);
        let created = employee.clone();
        self.mutate(|state| {
            state.employees.push(employee);
            Ok(Some(()))
        })
        .await?;
        info!(employee_id = %created.id, "employee created");
        Ok(created)
    }

    async fn delete_employee(&self, id: &str) -> LedgerResult<bool> {
        let deletion = self.deletion;
        let removed = self
            .mutate(|state| {
                let Some(index) = state.employees.iter().position(|e| e.id == id) else {
                    return Ok(None);
                };
                state.employees.remove(index);
                let before = state.vacations.len();
                if deletion == EmployeeDeletion::Cascade {
                    state.vacations.retain(|v| v.employee_id != id);
                }
                Ok(Some(before - state.vacations.len()))
            })
            .await?;

        match removed {
            Some(cascaded) => {
                info!(employee_id = id, cascaded_requests = cascaded, "employee deleted");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_leave_requests(&self, filter: &LeaveFilter) -> LedgerResult<Vec<LeaveRequest>> {
        let mut requests: Vec<LeaveRequest> = {
            let state = self.state.lock().await;
            state
                .vacations
                .iter()
                .filter(|r| filter.matches(r))
                .cloned()
                .collect()
        };
        sort_leave_requests(&mut requests);
        Ok(requests)
    }

    async fn get_leave_request(&self, id: &str) -> LedgerResult<Option<LeaveRequest>> {
        let state = self.state.lock().await;
        Ok(state.vacations.iter().find(|r| r.id == id).cloned())
    }

    async fn create_leave_request(&self, input: NewLeaveRequest) -> LedgerResult<LeaveRequest> {
        let request = input.into_leave_request(new_id())?;
        let created = request.clone();
        self.mutate(|state| {
            state.vacations.push(request);
            Ok(Some(()))
        })
        .await?;
        info!(
            leave_request_id = %created.id,
            employee_id = %created.employee_id,
            days = created.days(),
            "leave request created"
        );
        Ok(created)
    }

    async fn update_leave_request(
        &self,
        id: &str,
        patch: LeaveRequestPatch,
    ) -> LedgerResult<Option<LeaveRequest>> {
        patch.validate()?;
        self.mutate(|state| {
            let Some(existing) = state.vacations.iter_mut().find(|r| r.id == id) else {
                return Ok(None);
            };
            *existing = patch.apply(existing)?;
            Ok(Some(existing.clone()))
        })
        .await
    }

    async fn delete_leave_request(&self, id: &str) -> LedgerResult<bool> {
        let removed = self
            .mutate(|state| {
                let Some(index) = state.vacations.iter().position(|r| r.id == id) else {
                    return Ok(None);
                };
                state.vacations.remove(index);
                Ok(Some(()))
            })
            .await?;
        Ok(removed.is_some())
    }

    async fn list_holidays(&self, filter: &HolidayFilter) -> LedgerResult<Vec<Holiday>> {
        let mut holidays: Vec<Holiday> = {
            let state = self.state.lock().await;
            state
                .holidays
                .iter()
                .filter(|h| filter.matches(h))
                .cloned()
                .collect()
        };
        sort_holidays(&mut holidays);
        Ok(holidays)
    }

    async fn reset(&self) -> LedgerResult<()> {
        let seed = Snapshot::seed(self.seed_year);
        self.mutate(|state| {
            *state = seed;
            Ok(Some(()))
        })
        .await?;
        info!(key = %self.key, "ledger reset to seed data");
        Ok(())
    }
}
