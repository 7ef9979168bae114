//! Typed error handling for the inventory service
//!
//! Every failure a caller can react to has its own variant so that the
//! dashboard and the HTTP layer can tell a terminal condition (missing
//! configuration, missing table) from a retryable one (backend rejected a
//! write) or a local one (form validation).
//!
//! # Example
//!
//! ```rust,ignore
//! match store.create(fields).await {
//!     Ok(garment) => println!("stored {}", garment.id),
//!     Err(InventoryError::StorageUnavailable { message, .. }) => {
//!         eprintln!("backend refused the write: {}", message);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use crate::core::validation::FieldErrors;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the inventory service
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Backend endpoint or access key is missing or empty
    #[error("Storage backend is not configured: endpoint URL and access key are required")]
    NotConfigured,

    /// Backend is reachable but the garment table does not exist
    #[error("Table '{table}' does not exist; run the setup script first")]
    TableMissing { table: String },

    /// Request rejected by the backend or failed in transit
    #[error("Failed to {operation} garment: {message}")]
    StorageUnavailable { operation: String, message: String },

    /// Client-side field validation failed
    #[error("Validation failed: {0}")]
    ValidationFailed(FieldErrors),

    /// No garment with this id
    #[error("Garment with id '{id}' not found")]
    NotFound { id: Uuid },

    /// Path segment is not a UUID
    #[error("Invalid garment ID format: '{value}'")]
    InvalidId { value: String },

    /// Query string could not be interpreted
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl InventoryError {
    /// Shorthand for a storage failure during `operation`
    pub fn storage(operation: impl Into<String>, message: impl ToString) -> Self {
        InventoryError::StorageUnavailable {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            InventoryError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            InventoryError::TableMissing { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InventoryError::StorageUnavailable { .. } => StatusCode::BAD_GATEWAY,
            InventoryError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            InventoryError::NotFound { .. } => StatusCode::NOT_FOUND,
            InventoryError::InvalidId { .. } => StatusCode::BAD_REQUEST,
            InventoryError::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
            InventoryError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            InventoryError::NotConfigured => "NOT_CONFIGURED",
            InventoryError::TableMissing { .. } => "TABLE_MISSING",
            InventoryError::StorageUnavailable { .. } => "STORAGE_UNAVAILABLE",
            InventoryError::ValidationFailed(_) => "VALIDATION_FAILED",
            InventoryError::NotFound { .. } => "GARMENT_NOT_FOUND",
            InventoryError::InvalidId { .. } => "INVALID_ID",
            InventoryError::InvalidQuery { .. } => "INVALID_QUERY",
            InventoryError::Config { .. } => "CONFIG_ERROR",
        }
    }

    /// Whether the session cannot continue without operator action
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InventoryError::NotConfigured | InventoryError::TableMissing { .. }
        )
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            InventoryError::ValidationFailed(errors) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            InventoryError::NotFound { id } => Some(serde_json::json!({ "id": id.to_string() })),
            InventoryError::TableMissing { table } => Some(serde_json::json!({ "table": table })),
            _ => None,
        }
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }
        (status, Json(self.to_response())).into_response()
    }
}

impl From<FieldErrors> for InventoryError {
    fn from(errors: FieldErrors) -> Self {
        InventoryError::ValidationFailed(errors)
    }
}

impl From<serde_yaml::Error> for InventoryError {
    fn from(err: serde_yaml::Error) -> Self {
        InventoryError::Config {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for InventoryError {
    fn from(err: std::io::Error) -> Self {
        InventoryError::Config {
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::Field;

    #[test]
    fn test_storage_error_display() {
        let err = InventoryError::storage("create", "permission denied");
        assert_eq!(err.to_string(), "Failed to create garment: permission denied");
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_terminal_errors() {
        assert!(InventoryError::NotConfigured.is_terminal());
        assert!(
            InventoryError::TableMissing {
                table: "shirts".to_string()
            }
            .is_terminal()
        );
        assert!(!InventoryError::storage("list", "timeout").is_terminal());
    }

    #[test]
    fn test_validation_error_response_lists_fields() {
        let mut errors = FieldErrors::default();
        errors.insert(Field::Name, "Name is required");
        errors.insert(Field::Price, "Price cannot be negative");

        let err: InventoryError = errors.into();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = err.to_response();
        assert_eq!(response.code, "VALIDATION_FAILED");
        let details = response.details.expect("validation errors carry details");
        assert_eq!(details["fields"]["name"], "Name is required");
        assert_eq!(details["fields"]["price"], "Price cannot be negative");
    }

    #[test]
    fn test_not_found_details() {
        let id = Uuid::nil();
        let response = InventoryError::NotFound { id }.to_response();
        assert_eq!(response.code, "GARMENT_NOT_FOUND");
        assert_eq!(response.details.unwrap()["id"], id.to_string());
    }

    #[test]
    fn test_from_yaml_error_is_config() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("a: [").unwrap_err();
        let err: InventoryError = yaml_err.into();
        assert!(matches!(err, InventoryError::Config { .. }));
    }
}
