pub mod generation;
pub mod health;
pub mod poses;
pub mod sequences;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /generate-sequence                   one-shot parameter-driven generation (POST)
/// /generate-cues                       cue text for a single pose (POST)
///
/// /sequences                           list (auth), create skeleton (POST)
/// /sequences/fill-poses                fill a client-supplied structure (POST, auth)
/// /sequences/complete-poses            fill a stored skeleton, coalesced (POST)
/// /sequences/{id}                      get, update, delete
///
/// /phases/{id}/poses                   list, add pose placement (GET, POST)
/// /sequence-poses/{id}                 update, delete placement (PATCH, DELETE)
/// /sequence-poses/{id}/move            reposition placement (POST)
///
/// /poses                               catalog list (GET)
/// /poses/{id}                          catalog entry (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Generation endpoints (parameter-driven and per-pose cues).
        .merge(generation::router())
        // Sequence CRUD, structure-first fills, and the manual editor.
        .merge(sequences::router())
        // Read-only pose catalog.
        .merge(poses::router())
}
