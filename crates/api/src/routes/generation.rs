//! Route definitions for the generation endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Generation routes mounted at the API root.
///
/// ```text
/// POST /generate-sequence   -> generate_sequence
/// POST /generate-cues       -> generate_cues
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-sequence", post(generation::generate_sequence))
        .route("/generate-cues", post(generation::generate_cues))
}
