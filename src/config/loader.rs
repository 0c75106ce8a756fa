//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the ledger
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{LedgerError, LedgerResult};

use super::types::LedgerConfig;

/// Loads and provides access to the ledger configuration.
///
/// # Example
///
/// ```no_run
/// use leave_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/ledger.yaml").unwrap();
/// println!("Listening on {}", loader.config().server.bind);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: LedgerConfig,
}

impl ConfigLoader {
    /// Loads configuration from the YAML file at `path`.
    ///
    /// Returns `ConfigNotFound` if the file cannot be read and
    /// `ConfigParseError` if it is not valid YAML for [`LedgerConfig`].
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| LedgerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml(&content).map_err(|err| match err {
            LedgerError::ConfigParseError { message, .. } => LedgerError::ConfigParseError {
                path: path_str,
                message,
            },
            other => other,
        })
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml(content: &str) -> LedgerResult<Self> {
        // An empty document deserializes as unit, not as an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config =
            serde_yaml::from_str(content).map_err(|e| LedgerError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { config })
    }

    /// Applies environment overrides; see [`LedgerConfig::apply_env`].
    pub fn with_env(mut self) -> Self {
        self.config.apply_env();
        self
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> LedgerConfig {
        self.config
    }
}
