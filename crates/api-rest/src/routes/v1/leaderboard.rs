//! Leaderboard endpoint.

use super::{format_timestamp, metric_values, run_blocking, MetricValue};
use crate::{error::ApiResult, extractors::Session, responses::ApiResponse, state::AppState};
use axum::{extract::State, routing::get, Json, Router};
use leaderboard_application::LeaderboardEntry;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Leaderboard entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub participant: String,
    pub submission_name: String,
    pub submitted_at: String,
    pub score: Option<f64>,
    pub metrics: Vec<MetricValue>,
}

impl From<LeaderboardEntry> for LeaderboardRow {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            rank: entry.rank,
            score: entry.score(),
            metrics: metric_values(&entry.metrics),
            submitted_at: format_timestamp(&entry.submitted_at),
            participant: entry.participant,
            submission_name: entry.submission_name,
        }
    }
}

/// Leaderboard routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/leaderboard", get(get_leaderboard))
}

/// Get the leaderboard
///
/// Best submission per participant, ranked. Only the admin sees rows past the top K.
#[utoipa::path(
    get,
    path = "/leaderboard",
    context_path = "/api/v1",
    tag = "leaderboard",
    responses(
        (status = 200, description = "Ranked leaderboard", body = Vec<LeaderboardRow>),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Session(ctx): Session,
) -> ApiResult<Json<ApiResponse<Vec<LeaderboardRow>>>> {
    let competition = state.competition.clone();
    let entries = run_blocking(move || competition.leaderboard(&ctx)).await?;

    let rows = entries.into_iter().map(LeaderboardRow::from).collect();
    Ok(Json(ApiResponse::success(rows)))
}
