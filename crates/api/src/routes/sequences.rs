//! Route definitions for sequences, structure fills, and the manual editor.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{generation, sequences};
use crate::state::AppState;

/// Sequence and editor routes mounted at the API root.
///
/// Static segments (`fill-poses`, `complete-poses`) are registered before
/// the `{id}` capture so they never shadow each other.
///
/// ```text
/// GET    /sequences                    -> list (auth required)
/// POST   /sequences                    -> create skeleton
/// POST   /sequences/fill-poses         -> fill_poses (auth required)
/// POST   /sequences/complete-poses     -> complete_poses
/// GET    /sequences/{id}               -> get_by_id
/// PATCH  /sequences/{id}               -> update
/// DELETE /sequences/{id}               -> delete
///
/// GET    /phases/{id}/poses            -> list_phase_poses
/// POST   /phases/{id}/poses            -> add_pose
/// PATCH  /sequence-poses/{id}          -> update_pose
/// DELETE /sequence-poses/{id}          -> delete_pose
/// POST   /sequence-poses/{id}/move     -> move_pose
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/sequences",
            get(sequences::list).post(sequences::create),
        )
        .route("/sequences/fill-poses", post(generation::fill_poses))
        .route("/sequences/complete-poses", post(generation::complete_poses))
        .route(
            "/sequences/{id}",
            get(sequences::get_by_id)
                .patch(sequences::update)
                .delete(sequences::delete),
        )
        .route(
            "/phases/{id}/poses",
            get(sequences::list_phase_poses).post(sequences::add_pose),
        )
        .route(
            "/sequence-poses/{id}",
            patch(sequences::update_pose).delete(sequences::delete_pose),
        )
        .route("/sequence-poses/{id}/move", post(sequences::move_pose))
}
