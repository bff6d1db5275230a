//! Error types for the challenge leaderboard domain.
//!
//! Each concern has its own error enum; [`AppError`] unifies them and maps
//! every failure to a machine-readable code and an HTTP status.

/// Top-level application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Participant-related errors
    #[error("Participant error: {0}")]
    Participant(#[from] ParticipantError),

    /// Submission-related errors
    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    /// Evaluation-related errors
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    /// Authorization-related errors
    #[error("Authorization error: {0}")]
    Authorization(#[from] AuthorizationError),
}

impl AppError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Participant(err) => err.error_code(),
            Self::Submission(err) => err.error_code(),
            Self::Evaluation(_) => "EVALUATION_ERROR",
            Self::Authorization(_) => "UNAUTHORIZED",
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Participant(ParticipantError::InvalidName(_)) => 400,
            Self::Participant(ParticipantError::AlreadyExists(_)) => 409,
            Self::Participant(ParticipantError::NotFound(_)) => 404,
            Self::Participant(ParticipantError::LimitReached { .. }) => 409,
            Self::Submission(SubmissionError::MalformedFileName(_)) => 500,
            Self::Submission(_) => 422,
            Self::Evaluation(_) => 500,
            Self::Authorization(_) => 401,
        }
    }
}

/// Participant registry errors
#[derive(Debug, thiserror::Error)]
pub enum ParticipantError {
    /// Name is not a legal file name
    #[error("Invalid participant name: {0:?}")]
    InvalidName(String),

    /// Participant is already registered
    #[error("Participant already exists: {0}")]
    AlreadyExists(String),

    /// Participant is not registered
    #[error("Participant not found: {0}")]
    NotFound(String),

    /// Registering another participant would exceed the limit
    #[error("Participant limit reached: {max} participants")]
    LimitReached { max: usize },
}

impl ParticipantError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => "INVALID_NAME",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::NotFound(_) => "PARTICIPANT_NOT_FOUND",
            Self::LimitReached { .. } => "PARTICIPANT_LIMIT_REACHED",
        }
    }
}

/// Submission upload and storage errors
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// Extension would collide with the result sidecar
    #[error("Extension is reserved for result files: {0}")]
    ReservedExtension(String),

    /// Extension is not accepted by this competition
    #[error("Unsupported file extension {found:?}, expected {expected:?}")]
    ExtensionNotAllowed { expected: String, found: String },

    /// Stored file name does not follow the submission naming scheme
    #[error("Malformed submission file name: {0}")]
    MalformedFileName(String),
}

impl SubmissionError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ReservedExtension(_) => "RESERVED_EXTENSION",
            Self::ExtensionNotAllowed { .. } => "UNSUPPORTED_FORMAT",
            Self::MalformedFileName(_) => "MALFORMED_FILE_NAME",
        }
    }
}

/// Errors raised while an evaluator reads a submission
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    /// Reading the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents could not be interpreted
    #[error("Malformed submission content: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for EvaluationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Authorization errors
#[derive(Debug, thiserror::Error)]
pub enum AuthorizationError {
    /// Bearer token could not be verified
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::from(ParticipantError::InvalidName("a/b".to_string()));
        assert_eq!(err.error_code(), "INVALID_NAME");
        assert_eq!(err.http_status(), 400);

        let err = AppError::from(SubmissionError::ExtensionNotAllowed {
            expected: "csv".to_string(),
            found: "txt".to_string(),
        });
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
        assert_eq!(err.http_status(), 422);

        let err = AppError::from(AuthorizationError::InvalidToken("expired".to_string()));
        assert_eq!(err.error_code(), "UNAUTHORIZED");
        assert_eq!(err.http_status(), 401);
    }

    #[test]
    fn test_malformed_file_name_is_server_side() {
        let err = AppError::from(SubmissionError::MalformedFileName("x.json".to_string()));
        assert_eq!(err.error_code(), "MALFORMED_FILE_NAME");
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn test_extension_message_names_both_sides() {
        let err = SubmissionError::ExtensionNotAllowed {
            expected: "csv".to_string(),
            found: "txt".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported file extension \"txt\", expected \"csv\""
        );
    }
}
