//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes. Every failure becomes
//! a `{ "error": ... }` JSON body.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::dto::ErrorResponse;
use crate::relay::RelayError;

/// Message returned to clients for unexpected failures
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or invalid request input
    #[error("{0}")]
    Client(String),

    /// Missing process configuration (e.g. no upstream credential)
    #[error("{0}")]
    Config(String),

    /// Upstream API or transport failure
    #[error("{0}")]
    Upstream(String),

    /// Unexpected internal failure; detail is logged, never returned
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status and machine-readable code for this error
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Client(_) => (StatusCode::BAD_REQUEST, "CLIENT_ERROR"),
            ApiError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            ApiError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }

    /// Message safe to show to the client
    fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) | ApiError::Io(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::MissingCredential => ApiError::Config(err.to_string()),
            RelayError::ClientBuild(_) => ApiError::Internal(err.to_string()),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Client(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();

        if status.is_client_error() {
            tracing::warn!(error_code = %code, error_message = %self, "Rejected request");
        } else {
            tracing::error!(error_code = %code, error_message = %self, "API error occurred");
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
