//! Error type system for Keygate
//!
//! This module provides the error types for the gateway with:
//! - A fatal configuration error class that aborts startup
//! - A per-request authentication error class that always collapses to a
//!   uniform 401 response
//! - HTTP status code mapping and trace IDs on error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why an authentication attempt was rejected.
///
/// These variants exist for internal logging only. Every one of them is
/// reported to the client as the same generic unauthorized response, so the
/// rejection reason cannot be used as an oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Missing credential, or a token that does not decode
    #[error("credential or token missing or malformed")]
    Malformed,

    /// Token structure is valid but the signature does not verify
    #[error("token signature mismatch")]
    InvalidSignature,

    /// Token signature is valid but the expiry has passed
    #[error("token expired")]
    Expired,

    /// Plaintext credential does not match the stored hash
    #[error("credential does not match stored hash")]
    InvalidCredential,
}

/// Main error type for the Keygate gateway
#[derive(Debug, thiserror::Error)]
pub enum KeygateError {
    /// Fatal startup error. The process must not begin serving with an
    /// incomplete or malformed configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl KeygateError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            KeygateError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            KeygateError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            KeygateError::NotFound(_) => StatusCode::NOT_FOUND,
            KeygateError::ConfigError(_) | KeygateError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error type name for API responses and logs
    pub fn error_type(&self) -> &'static str {
        match self {
            KeygateError::ConfigError(_) => "ConfigError",
            KeygateError::InvalidRequest(_) => "InvalidRequest",
            KeygateError::Unauthorized(_) => "Unauthorized",
            KeygateError::NotFound(_) => "NotFound",
            KeygateError::Internal(_) => "InternalError",
        }
    }
}

/// Error response structure for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique trace ID for this error
    pub trace_id: String,
}

impl ErrorResponse {
    /// Create a new error response with a generated trace ID
    pub fn new(error: String, message: String) -> Self {
        Self {
            error,
            message,
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an error response from a KeygateError.
    ///
    /// Authentication failures are flattened to one fixed error/message pair
    /// regardless of variant; the concrete rejection reason stays in the logs.
    pub fn from_error(error: &KeygateError) -> Self {
        match error {
            KeygateError::Unauthorized(_) => {
                Self::new("Unauthorized".to_string(), "Unauthorized".to_string())
            }
            _ => Self::new(error.error_type().to_string(), error.to_string()),
        }
    }
}

/// Implement IntoResponse for KeygateError to enable automatic error handling in Axum
impl IntoResponse for KeygateError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = ErrorResponse::from_error(&self);

        match &self {
            // The rejection reason is logged but never sent to the client
            KeygateError::Unauthorized(kind) => {
                tracing::warn!(
                    reason = ?kind,
                    trace_id = %error_response.trace_id,
                    "Request rejected: unauthorized"
                );
            }
            _ => {
                tracing::error!(
                    error_type = self.error_type(),
                    trace_id = %error_response.trace_id,
                    status_code = %status_code,
                    "Request failed: {}",
                    self
                );
            }
        }

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for operations that can fail with KeygateError
pub type Result<T> = std::result::Result<T, KeygateError>;
