//! Submission upload endpoint.

use super::run_blocking;
use crate::{error::ApiResult, extractors::Session, responses::Created, state::AppState};
use axum::{
    body::Bytes,
    extract::{Query, State},
    routing::post,
    Router,
};
use leaderboard_application::{SubmissionReceipt, SubmissionUpload};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

/// Upload query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubmitQuery {
    /// Display name of the submission (at most 30 characters)
    pub name: Option<String>,

    /// Original file name; its extension is checked against the allowed one
    pub filename: Option<String>,
}

/// Accepted submission response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponse {
    pub participant: String,
    pub submission_name: String,
    pub rows: usize,
    pub total_score: f64,
    #[schema(value_type = Object)]
    pub average_score: BTreeMap<String, f64>,
    /// Per-row scores as CSV
    pub results_csv: String,
}

impl From<SubmissionReceipt> for SubmissionResponse {
    fn from(receipt: SubmissionReceipt) -> Self {
        Self {
            participant: receipt.participant,
            submission_name: receipt.submission_name,
            rows: receipt.result.scores.len(),
            total_score: receipt.result.total_score,
            average_score: receipt.result.average_score,
            results_csv: receipt.results_csv,
        }
    }
}

/// Submission routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/submissions", post(create_submission))
}

/// Submit a predictions file
///
/// The raw CSV is the request body. Every row is scored before anything is stored.
#[utoipa::path(
    post,
    path = "/submissions",
    context_path = "/api/v1",
    tag = "submissions",
    params(SubmitQuery),
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 201, description = "Submission scored and stored", body = SubmissionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "The admin account cannot submit"),
        (status = 409, description = "Participant limit reached"),
        (status = 422, description = "Upload rejected"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_submission(
    State(state): State<AppState>,
    Session(ctx): Session,
    Query(query): Query<SubmitQuery>,
    body: Bytes,
) -> ApiResult<Created<SubmissionResponse>> {
    let competition = state.competition.clone();
    let receipt = run_blocking(move || {
        let extension = query
            .filename
            .as_deref()
            .and_then(|filename| Path::new(filename).extension())
            .and_then(|ext| ext.to_str());
        let upload = SubmissionUpload {
            contents: &body,
            name: query.name.as_deref(),
            extension,
        };
        competition.submit(&ctx, upload, |progress| {
            debug!(
                row = progress.index + 1,
                total = progress.total,
                done = progress.fraction(),
                "row scored"
            );
        })
    })
    .await?;

    Ok(Created(receipt.into()))
}
