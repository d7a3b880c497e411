//! # Error Handling and Response Types
//!
//! Standardized error types, response format, and HTTP status mappings for
//! the index server. All request handlers return [`AppResult`], and the
//! [`AppError`] type converts itself into a consistent JSON error response:
//!
//! ```json
//! {
//!   "error": "Human-readable error message",
//!   "code": "machine_readable_error_code",
//!   "timestamp": "2024-01-01T12:00:00Z"
//! }
//! ```
//!
//! No internal paths or backtraces beyond the already-requested resource are
//! echoed back to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;

/// Standardized error response structure for consistent API error handling
#[derive(Serialize, Debug)]
pub struct ApiErrorResponse {
    pub error: String,     // Human-readable error message
    pub code: String,      // Machine-readable error code
    pub timestamp: String, // ISO 8601 timestamp
}

/// Error code classification for machine-readable error types
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorCode {
    ValidationError, // For malformed requests
    NotFound,        // For missing projects or artifact files
    InternalError,   // For server-side errors
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "validation_error",
            ErrorCode::NotFound => "not_found",
            ErrorCode::InternalError => "internal_error",
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Application-specific error types with error codes
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Get the appropriate error code for this error type
    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::BadRequest(_) => ErrorCode::ValidationError,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::InternalError(_) | AppError::Io(_) => ErrorCode::InternalError,
        }
    }

    /// Create a standardized error response
    pub fn to_error_response(&self) -> ApiErrorResponse {
        ApiErrorResponse {
            error: self.to_string(),
            code: self.error_code().as_str().to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");

        let error_response = self.to_error_response();
        let status = self.error_code().http_status();

        tracing::debug!(status = %status, code = %error_response.code, "Returning standardized error response");

        (status, axum::Json(error_response)).into_response()
    }
}

/// Convenient result type for application operations.
///
/// This type alias provides a standard Result type using [`AppError`] for all
/// application-level operations, reducing boilerplate in function signatures.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_map_to_expected_statuses() {
        assert_eq!(
            AppError::BadRequest("bad".into()).error_code().http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("missing".into()).error_code().http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InternalError("boom".into()).error_code().http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_response_carries_code_and_message() {
        let resp = AppError::NotFound("Unknown project: nope".into()).to_error_response();
        assert_eq!(resp.code, "not_found");
        assert_eq!(resp.error, "Unknown project: nope");
        assert!(!resp.timestamp.is_empty());
    }
}
