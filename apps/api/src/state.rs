use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::{Embedder, LanguageModel};
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Swappable model backend. Default: OllamaClient.
    pub llm: Arc<dyn LanguageModel>,
    pub embedder: Arc<dyn Embedder>,
    pub sessions: SessionStore,
    pub config: Config,
}
