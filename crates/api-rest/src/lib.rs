//! Challenge Leaderboard REST API
//!
//! Axum front end of the competition: uploads, the ranked leaderboard,
//! per-participant progress and bearer-token sessions.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use leaderboard_api_rest::{create_app, AppState};
//! use leaderboard_common::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     let app = create_app(AppState::new(config)?);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod app;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod routes;
pub mod state;

// Re-export commonly used types
pub use app::{create_app, ApiDoc};
pub use error::{ApiError, ApiResult};
pub use extractors::auth::{decode_token, issue_token, Claims};
pub use state::AppState;
