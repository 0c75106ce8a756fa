//! Configuration types for the leave ledger.
//!
//! These structures are deserialized from a YAML file. Every section and
//! field has a default, so an empty file is a valid configuration that runs
//! the local snapshot backend.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DEFAULT_ALLOWANCE_DAYS, DEFAULT_CARRYOVER_DAYS};

/// Storage key of the snapshot blob when none is configured.
pub const DEFAULT_SNAPSHOT_KEY: &str = "vacation-tracker-data";

/// Top-level ledger configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Remote backend settings. Used only when both URL and key are present.
    pub remote: RemoteConfig,
    /// Local snapshot backend settings.
    pub snapshot: SnapshotConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Defaults applied to new records and unqualified queries.
    pub defaults: DefaultsConfig,
    /// What deleting an employee does to their leave requests.
    pub employee_deletion: EmployeeDeletion,
}

impl LedgerConfig {
    /// Overrides fields from the process environment.
    ///
    /// Recognised variables: `LEDGER_REMOTE_URL`, `LEDGER_REMOTE_API_KEY`,
    /// `LEDGER_SNAPSHOT_DIR`, `LEDGER_BIND`.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Overrides fields from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("LEDGER_REMOTE_URL") {
            self.remote.base_url = Some(url);
        }
        if let Some(key) = lookup("LEDGER_REMOTE_API_KEY") {
            self.remote.api_key = Some(key);
        }
        if let Some(dir) = lookup("LEDGER_SNAPSHOT_DIR") {
            self.snapshot.directory = Some(PathBuf::from(dir));
        }
        if let Some(bind) = lookup("LEDGER_BIND") {
            self.server.bind = bind;
        }
    }
}

/// Settings for the remote backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the remote ledger service.
    pub base_url: Option<String>,
    /// API key sent with every request.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl RemoteConfig {
    /// Returns true when both the URL and the key are present and non-blank.
    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.base_url) && present(&self.api_key)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: 10,
        }
    }
}

/// Settings for the local snapshot backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Directory holding snapshot files. `None` keeps the snapshot in memory.
    pub directory: Option<PathBuf>,
    /// Storage key of the snapshot blob.
    pub key: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            directory: Some(PathBuf::from("data")),
            key: DEFAULT_SNAPSHOT_KEY.to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Defaults applied to new employees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Timezone given to new employees.
    pub timezone: String,
    /// Allowance given to new employees.
    pub allowance_days: Decimal,
    /// Carryover given to new employees.
    pub carryover_days: Decimal,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            timezone: "Europe/Paris".to_string(),
            allowance_days: DEFAULT_ALLOWANCE_DAYS,
            carryover_days: DEFAULT_CARRYOVER_DAYS,
        }
    }
}

/// Effect of deleting an employee on their leave requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeDeletion {
    /// Leave requests are kept and keep referencing the deleted employee.
    #[default]
    Keep,
    /// Leave requests of the deleted employee are deleted with it.
    Cascade,
}
