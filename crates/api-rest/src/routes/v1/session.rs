//! Session endpoints.

use crate::{
    error::ApiResult,
    extractors::{Session, SignedIn},
    responses::ApiResponse,
    state::AppState,
};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

/// Who the caller is
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub username: Option<String>,
    pub is_admin: bool,
}

/// Session routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/session", get(get_session))
        .route("/session/sign-out", post(sign_out))
}

/// Get the current session
#[utoipa::path(
    get,
    path = "/session",
    context_path = "/api/v1",
    tag = "session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "Invalid token"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_session(Session(ctx): Session) -> Json<ApiResponse<SessionResponse>> {
    Json(ApiResponse::success(SessionResponse {
        session_id: *ctx.session_id.as_uuid(),
        username: ctx.username,
        is_admin: ctx.is_admin,
    }))
}

/// Sign out
///
/// The token keeps verifying afterwards but its session is treated as anonymous.
#[utoipa::path(
    post,
    path = "/session/sign-out",
    context_path = "/api/v1",
    tag = "session",
    responses(
        (status = 200, description = "Signed out"),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn sign_out(
    State(state): State<AppState>,
    SignedIn { ctx, claims }: SignedIn,
) -> ApiResult<Json<ApiResponse<()>>> {
    let username = ctx.require_authenticated()?;
    info!(session = %ctx.session_id, user = username, "signed out");
    state.sign_out(ctx.session_id, claims.exp);
    Ok(Json(ApiResponse::message("Signed out")))
}
