use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::session::analysis::check_model_connection;
use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-ranker",
        "sessions": state.sessions.len().await,
    }))
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub reachable: bool,
    pub chat_model: String,
    pub embedding_model: String,
    pub available: Vec<String>,
}

/// GET /api/v1/models
/// Connectivity check against the model service.
pub async fn models_handler(
    State(state): State<AppState>,
) -> Result<Json<ModelsResponse>, AppError> {
    let available = check_model_connection(state.llm.as_ref()).await?;
    Ok(Json(ModelsResponse {
        reachable: true,
        chat_model: state.config.chat_model.clone(),
        embedding_model: state.config.embedding_model.clone(),
        available,
    }))
}
