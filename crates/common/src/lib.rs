//! Common utilities shared by the leaderboard services.
//!
//! - Configuration management
//! - Telemetry and structured logging
//! - Input validation helpers

pub mod config;
pub mod telemetry;
pub mod validation;

// Re-export commonly used types
pub use config::{AppConfig, AuthConfig, CompetitionConfig, ServerConfig, TelemetryConfig};
pub use telemetry::init_tracing;
pub use validation::{normalize_extension, validate_submission_name};

/// Common error type used throughout the crate
pub type Result<T> = std::result::Result<T, anyhow::Error>;
