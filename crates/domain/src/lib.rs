//! Challenge Leaderboard Domain Types
//!
//! Core model of the leaderboard: metrics and how they compare, the evaluator
//! seam, participant naming rules, and the on-disk submission naming scheme.
//!
//! ## Architecture
//!
//! - **metric**: comparable scores and metric tuples
//! - **evaluation**: the `Evaluator` and `RowScorer` capabilities
//! - **participant**: legal participant names
//! - **submission**: submission file names and result sidecars
//! - **session**: the login provider seam
//! - **identifiers**: UUID-based identifiers
//! - **errors**: error types with error codes and HTTP status codes
//!
//! ## Usage
//!
//! ```rust
//! use leaderboard_domain::{Metric, MetricSet, ParticipantName};
//!
//! let best = MetricSet::single(Metric::higher_is_better("score", 0.9));
//! let other = MetricSet::single(Metric::higher_is_better("score", 0.7));
//! assert!(best > other);
//!
//! assert!(ParticipantName::parse("team 7").is_ok());
//! assert!(ParticipantName::parse("../etc").is_err());
//! ```

#![warn(clippy::all)]

pub mod errors;
pub mod evaluation;
pub mod identifiers;
pub mod metric;
pub mod participant;
pub mod session;
pub mod submission;

pub use errors::{AppError, AuthorizationError, EvaluationError, ParticipantError, SubmissionError};
pub use evaluation::{Evaluator, RowScorer, TotalScoreEvaluator};
pub use identifiers::SessionId;
pub use metric::{Metric, MetricDescriptor, MetricSet};
pub use participant::{is_legal_filename, ParticipantName};
pub use session::LoginProvider;
pub use submission::{RowScores, SidecarResult, SubmissionFileName};
