use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ChatModel;
use crate::search::WebSearch;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Chat model used for every prompt. Default: `LlmClient` (Groq).
    pub llm: Arc<dyn ChatModel>,
    /// Web search backend for the job search fan-out. Default: `TavilyClient`.
    pub search: Arc<dyn WebSearch>,
    pub config: Config,
}
