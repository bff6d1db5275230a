//! Participant endpoints.

use super::{format_timestamp, metric_values, run_blocking, MetricValue};
use crate::{error::ApiResult, extractors::Session, responses::ApiResponse, state::AppState};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use leaderboard_application::{ProgressPoint, ProgressSeries};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One point of a participant's progress
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProgressPointResponse {
    pub submission_name: String,
    pub submitted_at: String,
    pub score: Option<f64>,
    pub metrics: Vec<MetricValue>,
}

impl From<ProgressPoint> for ProgressPointResponse {
    fn from(point: ProgressPoint) -> Self {
        Self {
            submitted_at: format_timestamp(&point.submitted_at),
            metrics: metric_values(&point.metrics),
            score: point.score,
            submission_name: point.submission_name,
        }
    }
}

/// Scores of every submission of one participant, oldest first
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProgressResponse {
    pub participant: String,
    pub metric_names: Vec<String>,
    pub points: Vec<ProgressPointResponse>,
}

impl From<ProgressSeries> for ProgressResponse {
    fn from(series: ProgressSeries) -> Self {
        Self {
            participant: series.participant,
            metric_names: series.metric_names,
            points: series.points.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of rescanning the submissions directory
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReloadResponse {
    pub participants: usize,
}

/// Participant routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/participants", get(list_participants))
        .route("/participants/reload", post(reload_participants))
        .route("/participants/:name/progress", get(get_progress))
}

/// List participants
///
/// Admin only.
#[utoipa::path(
    get,
    path = "/participants",
    context_path = "/api/v1",
    tag = "participants",
    responses(
        (status = 200, description = "Registered participant names", body = Vec<String>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_participants(
    State(state): State<AppState>,
    Session(ctx): Session,
) -> ApiResult<Json<ApiResponse<Vec<String>>>> {
    let competition = state.competition.clone();
    let names = run_blocking(move || competition.participants(&ctx)).await?;
    Ok(Json(ApiResponse::success(names)))
}

/// Get a participant's progress
///
/// Visible to the participant and the admin.
#[utoipa::path(
    get,
    path = "/participants/{name}/progress",
    context_path = "/api/v1",
    tag = "participants",
    params(
        ("name" = String, Path, description = "Participant name"),
    ),
    responses(
        (status = 200, description = "Progress series", body = ProgressResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the participant"),
        (status = 404, description = "Participant not found"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_progress(
    State(state): State<AppState>,
    Session(ctx): Session,
    Path(name): Path<String>,
) -> ApiResult<Json<ApiResponse<ProgressResponse>>> {
    let competition = state.competition.clone();
    let series = run_blocking(move || competition.progress(&ctx, &name)).await?;
    Ok(Json(ApiResponse::success(series.into())))
}

/// Rescan the submissions directory
///
/// Admin only. Drops every cached result so all submissions are evaluated again.
#[utoipa::path(
    post,
    path = "/participants/reload",
    context_path = "/api/v1",
    tag = "participants",
    responses(
        (status = 200, description = "Submissions reloaded", body = ReloadResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn reload_participants(
    State(state): State<AppState>,
    Session(ctx): Session,
) -> ApiResult<Json<ApiResponse<ReloadResponse>>> {
    let competition = state.competition.clone();
    let participants = run_blocking(move || competition.reload(&ctx)).await?;
    Ok(Json(ApiResponse::success_with_message(
        ReloadResponse { participants },
        "Submissions reloaded",
    )))
}
