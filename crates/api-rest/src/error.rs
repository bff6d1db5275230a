//! HTTP error handling and conversion.
//!
//! Errors from the domain and application layers map onto status codes and
//! a `{error, message}` JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use leaderboard_application::ApplicationError;
use leaderboard_domain::{AppError, AuthorizationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// API-specific error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Domain error
    #[error(transparent)]
    Domain(#[from] AppError),

    /// Application layer error
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        let status = match self {
            Self::Domain(err) => err.http_status(),
            Self::Application(err) => err.http_status(),
            Self::BadRequest(_) => 400,
            Self::Internal(_) => 500,
        };
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get error code for API response
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(err) => err.error_code(),
            Self::Application(err) => err.error_code(),
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Standardized error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error code
    pub error: String,

    /// Human-readable message
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        if status.is_server_error() {
            let detail = match &self {
                Self::Internal(detail) => detail.as_str(),
                _ => message.as_str(),
            };
            error!(error_code, detail, "request failed");
        }

        (status, Json(ErrorResponse::new(error_code, message))).into_response()
    }
}

impl From<AuthorizationError> for ApiError {
    fn from(err: AuthorizationError) -> Self {
        Self::Domain(AppError::Authorization(err))
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
