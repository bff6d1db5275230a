//! API v1 routes.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Router;
use leaderboard_application::ApplicationResult;
use leaderboard_domain::MetricSet;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod leaderboard;
pub mod participants;
pub mod session;
pub mod submissions;

/// Timestamp format used in responses
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Create all v1 API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(leaderboard::routes())
        .merge(submissions::routes())
        .merge(participants::routes())
        .merge(session::routes())
}

/// One metric of a scored submission
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MetricValue {
    pub name: String,
    pub value: f64,
    pub higher_is_better: bool,
}

pub(crate) fn metric_values(metrics: &MetricSet) -> Vec<MetricValue> {
    metrics
        .metrics()
        .iter()
        .map(|metric| MetricValue {
            name: metric.name().to_string(),
            value: metric.value(),
            higher_is_better: metric.is_higher_better(),
        })
        .collect()
}

pub(crate) fn format_timestamp(at: &chrono::NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Run a competition call on the blocking pool.
///
/// Competition calls hold the store lock while touching the filesystem.
pub(crate) async fn run_blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApplicationResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("Blocking task failed: {}", e)))?
        .map_err(ApiError::from)
}
