use serde::Deserialize;
use tracing::{info, warn};
use yogaflow_core::assembler::{assemble, carry_phase_ids, AssembledSequence, PhaseOutline, ResolvedSegment};
use yogaflow_core::catalog::CatalogPose;
use yogaflow_core::error::CoreError;
use yogaflow_core::fallback::{build_fallback_sequence, fill_outline};
use yogaflow_core::matcher::{resolve_structure, UnmatchedPosePolicy};
use yogaflow_core::params::GenerationParams;
use yogaflow_core::parser::parse_llm_sequence;
use yogaflow_core::prompt::{
    build_cue_prompt, build_fill_prompt, build_sequence_prompt, CUE_SYSTEM_PROMPT,
    SEQUENCE_SYSTEM_PROMPT,
};
use yogaflow_core::types::DbId;
use yogaflow_db::models::sequence::SequenceDetail;
use yogaflow_db::repositories::{PhaseRepo, PoseRepo, SequenceRepo};
use yogaflow_llm::LlmClient;

use crate::coalesce::{wait_for_outcome, Begin};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// A caller-designed sequence structure, before poses are filled in.
#[derive(Debug, Clone, Deserialize)]
pub struct StructureInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub segments: Vec<SegmentInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "durationMinutes")]
    pub duration_minutes: Option<i32>,
}

/// Body of `POST /sequences/fill-poses`.
#[derive(Debug, Deserialize)]
pub struct FillPosesRequest {
    pub structure: StructureInput,
    pub params: GenerationParams,
}

/// Body of `POST /sequences/complete-poses`: fill a previously persisted
/// skeleton, keeping its phase identities.
///
/// Like [`GenerationParams`], accepts the legacy camelCase field names.
#[derive(Debug, Deserialize)]
pub struct CompletePosesRequest {
    #[serde(alias = "sequenceId")]
    pub sequence_id: DbId,
    pub params: GenerationParams,
}

/// Body of `POST /generate-cues`.
#[derive(Debug, Deserialize)]
pub struct GenerateCuesRequest {
    #[serde(alias = "poseId")]
    pub pose_id: DbId,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default, alias = "existingCues")]
    pub existing_cues: Option<String>,
}

// ---------------------------------------------------------------------------
// Full generation
// ---------------------------------------------------------------------------

/// Generate and persist a complete sequence from request parameters.
///
/// Uses the model when one is configured; a model failure here propagates
/// to the caller (who retries the whole generation). Without a model, the
/// rule-based assembler serves the request.
pub async fn generate_sequence(
    state: &AppState,
    user_id: Option<DbId>,
    params: &GenerationParams,
) -> AppResult<SequenceDetail> {
    params.validate()?;
    let catalog = load_catalog(state).await?;

    let assembled = match &state.llm {
        Some(client) => ai_assemble(state, client, params, &catalog).await?,
        None => build_fallback_sequence(params, &catalog),
    };

    info!(
        poses = assembled.total_pose_count(),
        ai = assembled.ai_generated,
        "assembled sequence"
    );
    let detail = SequenceRepo::create_full(&state.pool, user_id, &assembled).await?;
    Ok(detail)
}

/// The full AI path: prompt, model call, parse, match, assemble.
async fn ai_assemble(
    state: &AppState,
    client: &LlmClient,
    params: &GenerationParams,
    catalog: &[CatalogPose],
) -> AppResult<AssembledSequence> {
    let prompt = build_sequence_prompt(params, &state.guidelines, catalog);
    let raw = client.complete(SEQUENCE_SYSTEM_PROMPT, &prompt).await?;
    let structure = parse_llm_sequence(&raw)?;
    let segments = resolve_structure(&structure, catalog, UnmatchedPosePolicy::FirstInCatalog)?;

    let description = Some(structure.description).filter(|d| !d.is_empty());
    Ok(assemble(structure.title, description, params, true, segments))
}

// ---------------------------------------------------------------------------
// Structure-first flows
// ---------------------------------------------------------------------------

/// Fill poses into a caller-designed structure and persist the result.
pub async fn fill_poses(
    state: &AppState,
    user_id: DbId,
    request: &FillPosesRequest,
) -> AppResult<SequenceDetail> {
    request.params.validate()?;
    if request.structure.segments.is_empty() {
        return Err(AppError::BadRequest(
            "structure must contain at least one segment".to_string(),
        ));
    }

    let catalog = load_catalog(state).await?;
    let outline = to_outline(&request.structure.segments);
    let (segments, ai_generated) = fill_segments(state, &request.params, &catalog, &outline).await;

    let assembled = assemble(
        request.structure.title.clone(),
        request.structure.description.clone(),
        &request.params,
        ai_generated,
        segments,
    );
    let detail = SequenceRepo::create_full(&state.pool, Some(user_id), &assembled).await?;
    Ok(detail)
}

/// Fill a previously persisted skeleton, carrying phase identities onto the
/// result.
///
/// Concurrent requests for the same sequence are coalesced: one caller does
/// the work, the rest wait for its outcome. The outcome stays available for
/// a short grace period afterwards.
pub async fn complete_poses(
    state: &AppState,
    request: &CompletePosesRequest,
) -> AppResult<serde_json::Value> {
    match state.completions.begin(request.sequence_id) {
        Begin::Owner(slot) => {
            let result = fill_existing(state, request).await;
            match result {
                Ok(detail) => {
                    let value = serde_json::to_value(&detail).map_err(|e| {
                        AppError::InternalError(format!("response serialization failed: {e}"))
                    })?;
                    slot.finish(Ok(value.clone()));
                    Ok(value)
                }
                Err(err) => {
                    slot.finish(Err(err.to_string()));
                    Err(err)
                }
            }
        }
        Begin::Follower(rx) => {
            info!(sequence_id = request.sequence_id, "joining in-flight completion");
            wait_for_outcome(rx).await.map_err(AppError::InternalError)
        }
    }
}

async fn fill_existing(
    state: &AppState,
    request: &CompletePosesRequest,
) -> AppResult<SequenceDetail> {
    request.params.validate()?;

    let sequence = SequenceRepo::find_by_id(&state.pool, request.sequence_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Sequence",
            id: request.sequence_id,
        }))?;

    let catalog = load_catalog(state).await?;
    let skeleton = PhaseRepo::list_by_sequence(&state.pool, sequence.id).await?;
    let skeleton_ids: Vec<DbId> = skeleton.iter().map(|p| p.id).collect();

    let mut assembled = if skeleton.is_empty() {
        // No structure to honor; treat it like a fresh generation but keep
        // the sequence's own title and description.
        let mut assembled = build_fallback_sequence(&request.params, &catalog);
        assembled.title = sequence.title.clone();
        assembled.description = sequence.description.clone();
        assembled
    } else {
        let outline: Vec<PhaseOutline> = skeleton
            .iter()
            .map(|phase| PhaseOutline {
                name: phase.name.clone(),
                description: phase.description.clone(),
                duration_minutes: phase.duration_minutes,
            })
            .collect();
        let (segments, ai_generated) =
            fill_segments(state, &request.params, &catalog, &outline).await;
        assemble(
            sequence.title.clone(),
            sequence.description.clone(),
            &request.params,
            ai_generated,
            segments,
        )
    };

    carry_phase_ids(&skeleton_ids, &mut assembled.phases);

    let detail = SequenceRepo::refill(&state.pool, sequence.id, &assembled)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Sequence",
            id: sequence.id,
        }))?;
    Ok(detail)
}

/// Fill segments for an outline: model fill when available, rule-based
/// otherwise. A model failure here never fails the request.
async fn fill_segments(
    state: &AppState,
    params: &GenerationParams,
    catalog: &[CatalogPose],
    outline: &[PhaseOutline],
) -> (Vec<ResolvedSegment>, bool) {
    if let Some(client) = &state.llm {
        match model_fill(state, client, params, catalog, outline).await {
            Ok(segments) => return (segments, true),
            Err(err) => {
                warn!(error = %err, "model fill failed, using rule-based fill");
            }
        }
    }
    (fill_outline(params, catalog, outline), false)
}

async fn model_fill(
    state: &AppState,
    client: &LlmClient,
    params: &GenerationParams,
    catalog: &[CatalogPose],
    outline: &[PhaseOutline],
) -> AppResult<Vec<ResolvedSegment>> {
    let prompt = build_fill_prompt(params, &state.guidelines, catalog, outline);
    let raw = client.complete(SEQUENCE_SYSTEM_PROMPT, &prompt).await?;
    let structure = parse_llm_sequence(&raw)?;
    let segments = resolve_structure(&structure, catalog, UnmatchedPosePolicy::FirstInCatalog)?;
    Ok(segments)
}

fn to_outline(segments: &[SegmentInput]) -> Vec<PhaseOutline> {
    segments
        .iter()
        .map(|segment| PhaseOutline {
            name: segment.name.clone(),
            description: segment.description.clone(),
            duration_minutes: segment.duration_minutes,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Cue generation
// ---------------------------------------------------------------------------

/// Generate teaching cues for one pose.
///
/// Model-backed when configured; otherwise (or when the model call fails)
/// a cue is derived from the catalog entry itself.
pub async fn generate_cues(state: &AppState, request: &GenerateCuesRequest) -> AppResult<String> {
    let pose = PoseRepo::find_by_id(&state.pool, request.pose_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Pose",
            id: request.pose_id,
        }))?;
    let catalog_pose = pose.to_catalog();

    if let Some(client) = &state.llm {
        let prompt = build_cue_prompt(
            &catalog_pose,
            request.side.as_deref(),
            request.existing_cues.as_deref(),
        );
        match client.complete(CUE_SYSTEM_PROMPT, &prompt).await {
            Ok(text) => return Ok(text.trim().to_string()),
            Err(err) => {
                warn!(error = %err, pose_id = pose.id, "cue generation failed, using catalog cue");
            }
        }
    }

    Ok(catalog_cue(&pose.name, catalog_pose.breath_cues.as_deref(), pose.benefits.as_deref()))
}

/// Derive a serviceable cue from catalog data alone.
fn catalog_cue(name: &str, breath_cues: Option<&str>, benefits: Option<&str>) -> String {
    match (breath_cues, benefits) {
        (Some(breath), _) => format!("Settle into {name}. {breath}."),
        (None, Some(benefits)) => {
            format!("Settle into {name} and breathe evenly. {benefits}.")
        }
        (None, None) => {
            format!("Settle into {name}, breathe evenly, and keep the pose steady and comfortable.")
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load the pose catalog in matcher order. An empty catalog is a 404: the
/// service cannot generate anything without reference data.
async fn load_catalog(state: &AppState) -> AppResult<Vec<CatalogPose>> {
    let poses = PoseRepo::list(&state.pool).await?;
    if poses.is_empty() {
        return Err(AppError::NotFound("the pose catalog is empty".to_string()));
    }
    Ok(poses.iter().map(|pose| pose.to_catalog()).collect())
}
