//! Configuration loading and management for the leave ledger.
//!
//! Configuration decides which ledger backend is built at startup, where the
//! local snapshot lives, and the defaults applied to new records.
//!
//! # Example
//!
//! ```no_run
//! use leave_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ledger.yaml").unwrap().with_env().into_config();
//! println!("Remote backend configured: {}", config.remote.is_configured());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_SNAPSHOT_KEY, DefaultsConfig, EmployeeDeletion, LedgerConfig, RemoteConfig,
    ServerConfig, SnapshotConfig,
};
