//! Error types for the leave ledger.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure a ledger operation can surface to its caller.

use thiserror::Error;

/// The main error type for the leave ledger.
///
/// Not-found outcomes of update/delete operations are reported through
/// sentinels (`Option`/`bool`) rather than this type; [`LedgerError::NotFound`]
/// is reserved for lookups the caller declared required.
///
/// # Example
///
/// ```
/// use leave_ledger::error::LedgerError;
///
/// let error = LedgerError::Validation {
///     field: "employee_id".to_string(),
///     message: "an employee is required".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid field 'employee_id': an employee is required"
/// );
/// ```
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A required field was missing or structurally invalid.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A required record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: String,
        /// The identifier that was not found.
        id: String,
    },

    /// The remote backend rejected or failed to complete an operation.
    #[error("Backend error: {message}")]
    Backend {
        /// The server message, or a generic fallback.
        message: String,
    },

    /// The local snapshot could not be written.
    #[error("Failed to persist snapshot '{key}': {message}")]
    Storage {
        /// The storage key of the snapshot.
        key: String,
        /// A description of the write failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl LedgerError {
    /// Builds a validation error for `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        LedgerError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Builds a not-found error for a record of kind `entity`.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        LedgerError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Builds a backend error carrying `message` verbatim.
    pub fn backend(message: impl Into<String>) -> Self {
        LedgerError::Backend {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_displays_field_and_message() {
        let error = LedgerError::validation("start_date", "a start date is required");
        assert_eq!(
            error.to_string(),
            "Invalid field 'start_date': a start date is required"
        );
    }

    #[test]
    fn test_not_found_displays_entity_and_id() {
        let error = LedgerError::not_found("Employee", "emp-zoe");
        assert_eq!(error.to_string(), "Employee not found: emp-zoe");
    }

    #[test]
    fn test_backend_error_keeps_message_verbatim() {
        let error = LedgerError::backend("duplicate key value violates unique constraint");
        assert_eq!(
            error.to_string(),
            "Backend error: duplicate key value violates unique constraint"
        );
    }

    #[test]
    fn test_storage_error_displays_key_and_message() {
        let error = LedgerError::Storage {
            key: "vacation-tracker-data".to_string(),
            message: "read-only file system".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to persist snapshot 'vacation-tracker-data': read-only file system"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = LedgerError::ConfigParseError {
            path: "/config/ledger.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/ledger.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<LedgerError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> LedgerResult<()> {
            Err(LedgerError::not_found("LeaveRequest", "vac-1"))
        }

        fn propagates_error() -> LedgerResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(matches!(
            propagates_error(),
            Err(LedgerError::NotFound { .. })
        ));
    }
}
