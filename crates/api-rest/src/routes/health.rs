//! Health check endpoints.

use crate::{responses::ApiResponse, state::AppState};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Readiness check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Individual component checks
    pub checks: ReadinessChecks,
}

/// Individual readiness checks
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessChecks {
    /// Submissions directory is present
    pub submissions_dir: bool,

    /// Configured evaluator
    pub evaluator: String,
}

/// Health check routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
}

/// Basic health check
///
/// Returns service status and version information.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Json(ApiResponse::success(response))
}

/// Readiness check
///
/// Ready once the submissions directory can be read.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "Submissions directory is missing", body = ReadinessResponse)
    )
)]
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<ReadinessResponse>>) {
    let competition = &state.competition;
    let checks = ReadinessChecks {
        submissions_dir: competition.config().submissions_dir.is_dir(),
        evaluator: competition.evaluator().name().to_string(),
    };

    let ready = checks.submissions_dir;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ApiResponse::success(ReadinessResponse { ready, checks })))
}
