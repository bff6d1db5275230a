//! Application layer for the challenge leaderboard
//!
//! This crate orchestrates domain logic over the filesystem store.
//!
//! ## Modules
//!
//! - `scoring` - Upload parsing, per-row scoring and result aggregation
//! - `services` - Session context, leaderboard, progress and the competition façade

pub mod scoring;
pub mod services;

// Re-export commonly used types
pub use scoring::{
    evaluator_from_name, parse_upload, render_results_csv, ColumnRowScorer, ScoringProgress,
    ScoringRun, UploadRow,
};
pub use services::{
    rank_entries, Competition, LeaderboardEntry, ProgressPoint, ProgressSeries, SessionContext,
    SubmissionReceipt, SubmissionUpload,
};

use leaderboard_domain::{ParticipantError, SubmissionError};
use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug, Clone)]
pub enum ApplicationError {
    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Authentication required
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upload rejected; the message is meant for the participant
    #[error("{0}")]
    ValidationFailed(String),

    /// Resource conflict (e.g., duplicate)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Storage unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApplicationError {
    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            ApplicationError::NotFound(_) => 404,
            ApplicationError::Unauthorized(_) => 401,
            ApplicationError::Forbidden(_) => 403,
            ApplicationError::InvalidInput(_) => 400,
            ApplicationError::ValidationFailed(_) => 422,
            ApplicationError::Conflict(_) => 409,
            ApplicationError::Internal(_) => 500,
            ApplicationError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ApplicationError::NotFound(_) => "NOT_FOUND",
            ApplicationError::Unauthorized(_) => "UNAUTHORIZED",
            ApplicationError::Forbidden(_) => "FORBIDDEN",
            ApplicationError::InvalidInput(_) => "INVALID_INPUT",
            ApplicationError::ValidationFailed(_) => "VALIDATION_FAILED",
            ApplicationError::Conflict(_) => "CONFLICT",
            ApplicationError::Internal(_) => "INTERNAL_ERROR",
            ApplicationError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

impl From<ParticipantError> for ApplicationError {
    fn from(err: ParticipantError) -> Self {
        match err {
            ParticipantError::InvalidName(_) => ApplicationError::InvalidInput(err.to_string()),
            ParticipantError::NotFound(_) => ApplicationError::NotFound(err.to_string()),
            ParticipantError::AlreadyExists(_) | ParticipantError::LimitReached { .. } => {
                ApplicationError::Conflict(err.to_string())
            }
        }
    }
}

impl From<SubmissionError> for ApplicationError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::MalformedFileName(_) => ApplicationError::Internal(err.to_string()),
            _ => ApplicationError::ValidationFailed(err.to_string()),
        }
    }
}

impl From<leaderboard_infrastructure::Error> for ApplicationError {
    fn from(err: leaderboard_infrastructure::Error) -> Self {
        use leaderboard_infrastructure::Error;
        match err {
            Error::Participant(err) => err.into(),
            Error::Submission(err) => err.into(),
            Error::Io { .. } => ApplicationError::ServiceUnavailable(err.to_string()),
            Error::Evaluation { .. } | Error::Serialization(_) => {
                ApplicationError::Internal(err.to_string())
            }
        }
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;
