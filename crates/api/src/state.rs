use std::sync::Arc;

use yogaflow_llm::LlmClient;

use crate::coalesce::CompletionGuard;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: yogaflow_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Chat-completion client. `None` means no API key is configured and
    /// every generation request uses the rule-based assembler.
    pub llm: Option<Arc<LlmClient>>,
    /// Sequencing guidelines injected into generation prompts.
    pub guidelines: Arc<String>,
    /// Per-sequence coalescing of concurrent pose-completion requests.
    pub completions: Arc<CompletionGuard>,
}
