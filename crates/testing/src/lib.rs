//! Testing utilities for the challenge leaderboard
//!
//! - Fixtures: temporary submissions directories, sample uploads, sidecars
//!   with fixed timestamps
//! - Mocks: an evaluator that records every call, a row scorer with fixed
//!   output, a login provider with static answers
//!
//! # Examples
//!
//! ```
//! use leaderboard_testing::{fixtures::*, mocks::*};
//!
//! let dir = TestSubmissionsDir::new();
//! write_sidecar(&dir.participant_dir("alice"), "baseline", timestamp(0), Some(0.9));
//!
//! let evaluator = CountingEvaluator::new();
//! assert_eq!(evaluator.call_count(), 0);
//! ```

pub mod fixtures;
pub mod mocks;

// Re-export commonly used types
pub use fixtures::*;
pub use mocks::*;

// Re-export testing dependencies for convenience
pub use proptest;
