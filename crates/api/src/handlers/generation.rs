//! Handlers for the generation endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use yogaflow_core::params::GenerationParams;
use yogaflow_db::models::sequence::SequenceDetail;

use crate::engine::{self, CompletePosesRequest, FillPosesRequest, GenerateCuesRequest};
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::handlers::sequences::ensure_owner;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::state::AppState;

/// Response envelope for endpoints returning one full sequence.
#[derive(Debug, Serialize)]
pub struct SequenceResponse {
    pub sequence: SequenceDetail,
}

/// Response envelope for cue generation.
#[derive(Debug, Serialize)]
pub struct CuesResponse {
    pub cues: String,
}

/// POST /api/v1/generate-sequence
///
/// Anonymous callers get a trial sequence (no owner); authenticated callers
/// own the result.
pub async fn generate_sequence(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    AppJson(params): AppJson<GenerationParams>,
) -> AppResult<(StatusCode, Json<SequenceResponse>)> {
    let sequence = engine::generate_sequence(&state, user.user_id(), &params).await?;
    Ok((StatusCode::CREATED, Json(SequenceResponse { sequence })))
}

/// POST /api/v1/generate-cues
pub async fn generate_cues(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateCuesRequest>,
) -> AppResult<Json<CuesResponse>> {
    let cues = engine::generate_cues(&state, &request).await?;
    Ok(Json(CuesResponse { cues }))
}

/// POST /api/v1/sequences/fill-poses
///
/// Requires authentication: the filled sequence is always owned.
pub async fn fill_poses(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<FillPosesRequest>,
) -> AppResult<(StatusCode, Json<SequenceResponse>)> {
    let sequence = engine::fill_poses(&state, user.user_id, &request).await?;
    Ok((StatusCode::CREATED, Json(SequenceResponse { sequence })))
}

/// POST /api/v1/sequences/complete-poses
///
/// Fills a previously created skeleton. Ownership is enforced before the
/// (coalesced) fill runs.
pub async fn complete_poses(
    State(state): State<AppState>,
    user: MaybeAuthUser,
    AppJson(request): AppJson<CompletePosesRequest>,
) -> AppResult<Json<serde_json::Value>> {
    // The engine re-checks existence inside the coalesced section; this
    // check keeps a foreign caller from even joining the in-flight fill.
    if let Some(sequence) =
        yogaflow_db::repositories::SequenceRepo::find_by_id(&state.pool, request.sequence_id)
            .await?
    {
        ensure_owner(&sequence, user.user_id())?;
    }

    let detail = engine::complete_poses(&state, &request).await?;
    Ok(Json(json!({ "sequence": detail })))
}
