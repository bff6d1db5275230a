//! Filesystem-backed submission storage.

mod manager;
mod participant;

pub use manager::SubmissionManager;
pub use participant::{ParticipantSubmissions, ScoredSubmission};
