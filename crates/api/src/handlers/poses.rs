//! Handlers for the read-only `/poses` catalog resource.

use axum::extract::{Path, State};
use axum::Json;
use yogaflow_core::error::CoreError;
use yogaflow_core::types::DbId;
use yogaflow_db::models::pose::Pose;
use yogaflow_db::repositories::PoseRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/poses
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Pose>>> {
    let poses = PoseRepo::list(&state.pool).await?;
    Ok(Json(poses))
}

/// GET /api/v1/poses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Pose>> {
    let pose = PoseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Pose", id }))?;
    Ok(Json(pose))
}
