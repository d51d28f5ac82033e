//! Route definitions for the read-only pose catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::poses;
use crate::state::AppState;

/// Pose catalog routes mounted at the API root.
///
/// ```text
/// GET /poses        -> list
/// GET /poses/{id}   -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/poses", get(poses::list))
        .route("/poses/{id}", get(poses::get_by_id))
}
