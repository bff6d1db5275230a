//! Infrastructure layer for the challenge leaderboard
//!
//! The filesystem is the source of truth for participants and submissions:
//!
//! ```text
//! {submissions_dir}/{participant}/{base64(name)}_{timestamp}{.ext}
//! {submissions_dir}/{participant}/{base64(name)}_{timestamp}.json
//! ```
//!
//! Evaluation results are cached in memory on top of it and never written back.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use leaderboard_domain::TotalScoreEvaluator;
//! use leaderboard_infrastructure::SubmissionManager;
//!
//! # fn main() -> leaderboard_infrastructure::Result<()> {
//! let mut manager = SubmissionManager::new("submissions")?;
//! let participant = manager.add_participant("alice", true)?;
//! participant.update_results(&TotalScoreEvaluator::new())?;
//! let best = participant.get_best_result();
//! # Ok(())
//! # }
//! ```

pub mod submissions;

pub use submissions::{ParticipantSubmissions, ScoredSubmission, SubmissionManager};

use leaderboard_domain::{EvaluationError, ParticipantError, SubmissionError};
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure-level errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem errors
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Participant registry errors
    #[error(transparent)]
    Participant(#[from] ParticipantError),

    /// Submission naming and storage errors
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// Evaluator failed on a stored submission
    #[error("Failed to evaluate {}: {source}", .path.display())]
    Evaluation {
        path: PathBuf,
        #[source]
        source: EvaluationError,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::Io { path, source }
    }

    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Participant(ParticipantError::NotFound(_)) => 404,
            Error::Participant(ParticipantError::InvalidName(_)) => 400,
            Error::Participant(_) => 409,
            Error::Submission(SubmissionError::MalformedFileName(_)) => 500,
            Error::Submission(_) => 422,
            Error::Io { .. } => 503,
            Error::Evaluation { .. } | Error::Serialization(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_http_status() {
        let err = Error::from(ParticipantError::InvalidName("a/b".to_string()));
        assert_eq!(err.http_status(), 400);

        let err = Error::from(ParticipantError::AlreadyExists("alice".to_string()));
        assert_eq!(err.http_status(), 409);

        let err = Error::io("/tmp/x")(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert_eq!(err.http_status(), 503);
        assert!(err.to_string().contains("/tmp/x"));
    }

    #[test]
    fn test_transparent_messages() {
        let err = Error::from(SubmissionError::ReservedExtension("json".to_string()));
        assert_eq!(err.to_string(), "Extension is reserved for result files: json");
    }
}
