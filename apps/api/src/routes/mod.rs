pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.upload_limit_bytes();

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/models", get(health::models_handler))
        // Session API
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route("/api/v1/sessions/:id", get(handlers::handle_get_session))
        .route(
            "/api/v1/sessions/:id/resumes",
            post(handlers::handle_upload_resumes),
        )
        .route(
            "/api/v1/sessions/:id/analyze",
            post(handlers::handle_analyze),
        )
        .route(
            "/api/v1/sessions/:id/ranking",
            get(handlers::handle_get_ranking),
        )
        .route(
            "/api/v1/sessions/:id/top-candidates",
            get(handlers::handle_top_candidates),
        )
        .route(
            "/api/v1/sessions/:id/insights",
            get(handlers::handle_insights),
        )
        .route(
            "/api/v1/sessions/:id/chat",
            post(handlers::handle_chat).get(handlers::handle_chat_history),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
