//! Application builder.
//!
//! Assembles routes, middleware and state into an Axum router.

use crate::{
    middleware::{logging_middleware, request_id_middleware},
    routes,
    state::AppState,
};
use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut app = Router::new()
        // Health check routes (no auth required)
        .merge(routes::health::routes())
        // API v1 routes
        .nest("/api/v1", routes::v1::routes())
        .with_state(state);

    if config.server.enable_swagger {
        app = app.merge(swagger_ui());
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(cors)
            .layer(TimeoutLayer::new(config.request_timeout()))
            .layer(middleware::from_fn(request_id_middleware))
            .layer(middleware::from_fn(logging_middleware)),
    )
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Challenge Leaderboard API",
        version = "1.0.0",
        description = "Submit predictions, follow the leaderboard and track your progress",
        license(name = "MIT"),
    ),
    paths(
        routes::health::health,
        routes::health::ready,
        routes::v1::leaderboard::get_leaderboard,
        routes::v1::submissions::create_submission,
        routes::v1::participants::list_participants,
        routes::v1::participants::get_progress,
        routes::v1::participants::reload_participants,
        routes::v1::session::get_session,
        routes::v1::session::sign_out,
    ),
    components(schemas(
        crate::error::ErrorResponse,
        routes::health::HealthResponse,
        routes::health::ReadinessResponse,
        routes::health::ReadinessChecks,
        routes::v1::MetricValue,
        routes::v1::leaderboard::LeaderboardRow,
        routes::v1::submissions::SubmissionResponse,
        routes::v1::participants::ProgressResponse,
        routes::v1::participants::ProgressPointResponse,
        routes::v1::participants::ReloadResponse,
        routes::v1::session::SessionResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "leaderboard", description = "Ranked best submissions"),
        (name = "submissions", description = "Prediction uploads"),
        (name = "participants", description = "Participants and their progress"),
        (name = "session", description = "Current session and sign-out"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
