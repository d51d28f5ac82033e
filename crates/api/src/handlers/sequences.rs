//! Handlers for the `/sequences` resource and the manual editor endpoints.
//!
//! Ownership model: a sequence with a `user_id` may only be read or edited
//! by that user (403 otherwise); ownerless sequences are anonymous trial
//! data, open to any caller.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use yogaflow_core::error::CoreError;
use yogaflow_core::params::MAX_DURATION_MINUTES;
use yogaflow_core::types::DbId;
use yogaflow_db::models::sequence::{CreateSequence, Sequence, SequenceDetail, UpdateSequence};
use yogaflow_db::models::sequence_pose::{
    CreateSequencePose, MoveSequencePose, SequencePose, UpdateSequencePose,
};
use yogaflow_db::repositories::{PhaseRepo, SequencePoseRepo, SequenceRepo};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::state::AppState;

/// Check that `user_id` may act on `sequence`.
///
/// Ownerless sequences are trial data and open to everyone, including
/// anonymous callers.
pub fn ensure_owner(sequence: &Sequence, user_id: Option<DbId>) -> Result<(), AppError> {
    match sequence.user_id {
        Some(owner) if user_id != Some(owner) => Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this sequence".into(),
        ))),
        _ => Ok(()),
    }
}

async fn load_owned(
    state: &AppState,
    id: DbId,
    user_id: Option<DbId>,
) -> AppResult<Sequence> {
    let sequence = SequenceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Sequence",
            id,
        }))?;
    ensure_owner(&sequence, user_id)?;
    Ok(sequence)
}

// ---------------------------------------------------------------------------
// Sequence CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/sequences
///
/// Creates a sequence skeleton (metadata plus empty phases) for the
/// structure-first flow, or a manual sequence to be edited by hand.
pub async fn create(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    AppJson(input): AppJson<CreateSequence>,
) -> AppResult<(StatusCode, Json<SequenceDetail>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }
    if input.duration_minutes < 1 || input.duration_minutes > MAX_DURATION_MINUTES as i32 {
        return Err(AppError::BadRequest(format!(
            "duration_minutes must be between 1 and {MAX_DURATION_MINUTES}"
        )));
    }

    let detail = SequenceRepo::create_skeleton(&state.pool, user.user_id(), &input).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/sequences
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Sequence>>> {
    let sequences = SequenceRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(sequences))
}

/// GET /api/v1/sequences/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<SequenceDetail>> {
    load_owned(&state, id, user.user_id()).await?;
    let detail = SequenceRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Sequence",
            id,
        }))?;
    Ok(Json(detail))
}

/// PATCH /api/v1/sequences/{id}
pub async fn update(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateSequence>,
) -> AppResult<Json<Sequence>> {
    load_owned(&state, id, user.user_id()).await?;
    let sequence = SequenceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Sequence",
            id,
        }))?;
    Ok(Json(sequence))
}

/// DELETE /api/v1/sequences/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_owned(&state, id, user.user_id()).await?;
    let deleted = SequenceRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Sequence",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Manual editor: pose placements
// ---------------------------------------------------------------------------

/// GET /api/v1/phases/{id}/poses
pub async fn list_phase_poses(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Path(phase_id): Path<DbId>,
) -> AppResult<Json<Vec<SequencePose>>> {
    let phase = PhaseRepo::find_by_id(&state.pool, phase_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Phase",
            id: phase_id,
        }))?;
    load_owned(&state, phase.sequence_id, user.user_id()).await?;

    let poses = SequencePoseRepo::list_by_phase(&state.pool, phase_id).await?;
    Ok(Json(poses))
}

/// POST /api/v1/phases/{id}/poses
pub async fn add_pose(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Path(phase_id): Path<DbId>,
    AppJson(input): AppJson<CreateSequencePose>,
) -> AppResult<(StatusCode, Json<SequencePose>)> {
    let phase = PhaseRepo::find_by_id(&state.pool, phase_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Phase",
            id: phase_id,
        }))?;
    load_owned(&state, phase.sequence_id, user.user_id()).await?;

    let created = SequencePoseRepo::create(&state.pool, phase_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Phase",
            id: phase_id,
        }))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/v1/sequence-poses/{id}
pub async fn update_pose(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateSequencePose>,
) -> AppResult<Json<SequencePose>> {
    let existing = load_placement(&state, id).await?;
    load_owned(&state, existing.sequence_id, user.user_id()).await?;

    let updated = SequencePoseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Sequence pose",
            id,
        }))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/sequence-poses/{id}
pub async fn delete_pose(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = load_placement(&state, id).await?;
    load_owned(&state, existing.sequence_id, user.user_id()).await?;

    let deleted = SequencePoseRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Sequence pose",
            id,
        }))
    }
}

/// POST /api/v1/sequence-poses/{id}/move
pub async fn move_pose(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<MoveSequencePose>,
) -> AppResult<Json<SequencePose>> {
    let existing = load_placement(&state, id).await?;
    load_owned(&state, existing.sequence_id, user.user_id()).await?;

    let moved = SequencePoseRepo::move_pose(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Sequence pose",
            id,
        }))?;
    Ok(Json(moved))
}

async fn load_placement(state: &AppState, id: DbId) -> AppResult<SequencePose> {
    SequencePoseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Sequence pose",
            id,
        }))
}
