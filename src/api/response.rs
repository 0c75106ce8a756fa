//! Error bodies for the ledger API.
//!
//! Every failure is answered with a JSON [`ApiError`]. The same shape is read
//! back by [`crate::store::RemoteLedger`], so the `message` and `details` of a
//! validation failure carry the raw message and the offending field.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// A validation failure on `field`.
    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_details("VALIDATION_ERROR", message, field)
    }

    /// A body that is not the JSON the route expects.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// A missing record.
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found: {}", entity, id))
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Pairs `error` with `status`.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<LedgerError> for ApiErrorResponse {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::Validation { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::validation_error(field, message),
            },
            LedgerError::NotFound { entity, id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::not_found(&entity, &id),
            },
            LedgerError::Backend { message } => ApiErrorResponse {
                status: StatusCode::BAD_GATEWAY,
                error: ApiError::new("BACKEND_ERROR", message),
            },
            error @ LedgerError::Storage { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::new("STORAGE_ERROR", error.to_string()),
            },
            LedgerError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            LedgerError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_without_details_deserializes() {
        let error: ApiError =
            serde_json::from_str(r#"{"code":"BACKEND_ERROR","message":"down"}"#).unwrap();
        assert_eq!(error.details, None);
    }

    #[test]
    fn test_validation_keeps_field_and_raw_message() {
        let response: ApiErrorResponse =
            LedgerError::validation("employee_id", "an employee is required").into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "VALIDATION_ERROR");
        assert_eq!(response.error.message, "an employee is required");
        assert_eq!(response.error.details.as_deref(), Some("employee_id"));
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response: ApiErrorResponse = LedgerError::not_found("Employee", "emp-x").into();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.error.message, "Employee not found: emp-x");
    }

    #[test]
    fn test_backend_message_is_passed_through() {
        let response: ApiErrorResponse = LedgerError::backend("relation does not exist").into();
        assert_eq!(response.status, StatusCode::BAD_GATEWAY);
        assert_eq!(response.error.code, "BACKEND_ERROR");
        assert_eq!(response.error.message, "relation does not exist");
    }

    #[test]
    fn test_storage_failure_maps_to_500() {
        let response: ApiErrorResponse = LedgerError::Storage {
            key: "vacation-tracker-data".to_string(),
            message: "read-only file system".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.code, "STORAGE_ERROR");
    }
}
