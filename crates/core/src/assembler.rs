//! Final sequence assembly: positions, phase ordering, and phase identity
//! carry-over for the two-phase (structure-then-poses) generation flow.

use crate::params::{Difficulty, Focus, GenerationParams, Style};
use crate::types::DbId;

/// Position stride between phases. Poses in phase `k` start at `k * 100`,
/// which keeps sequencing phase-ordered while tolerating gaps from edits.
pub const PHASE_POSITION_STRIDE: i32 = 100;

// ---------------------------------------------------------------------------
// Resolved input (produced by the matcher or the fallback assembler)
// ---------------------------------------------------------------------------

/// A phase skeleton without poses: what the structure-first flow hands to
/// the pose-filling step (prompting and rule-based fill alike).
#[derive(Debug, Clone)]
pub struct PhaseOutline {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
}

/// One segment with every pose suggestion resolved to a catalog entry.
#[derive(Debug, Clone)]
pub struct ResolvedSegment {
    pub name: String,
    pub description: String,
    pub intensity: Option<String>,
    /// Time budget for the phase, when the producer computed one.
    pub duration_minutes: Option<i32>,
    pub poses: Vec<ResolvedPose>,
}

/// One pose placement resolved to a catalog entry.
#[derive(Debug, Clone)]
pub struct ResolvedPose {
    pub pose_id: DbId,
    pub name: String,
    pub duration_secs: i32,
    /// `"left"`, `"right"`, `"both"`, or `""` for center.
    pub side: String,
    pub cues: String,
}

// ---------------------------------------------------------------------------
// Assembled output (consumed by the persistence writer)
// ---------------------------------------------------------------------------

/// A fully assembled sequence ready to persist.
#[derive(Debug, Clone)]
pub struct AssembledSequence {
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub difficulty: Difficulty,
    pub style: Style,
    pub focus: Focus,
    pub ai_generated: bool,
    pub phases: Vec<AssembledPhase>,
}

#[derive(Debug, Clone)]
pub struct AssembledPhase {
    /// Identifier carried over from a previously persisted skeleton phase.
    /// `None` means the phase is new and gets a fresh identity on insert.
    pub carried_id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
    pub duration_minutes: Option<i32>,
    pub intensity: Option<String>,
    pub poses: Vec<AssembledPose>,
}

#[derive(Debug, Clone)]
pub struct AssembledPose {
    pub pose_id: DbId,
    pub name: String,
    pub position: i32,
    pub duration_secs: i32,
    pub side: String,
    pub cues: String,
}

impl AssembledSequence {
    /// Total number of pose placements across all phases.
    pub fn total_pose_count(&self) -> usize {
        self.phases.iter().map(|p| p.poses.len()).sum()
    }

    /// Sum of pose durations. Informational, not enforced against
    /// `duration_minutes`.
    pub fn total_duration_secs(&self) -> i64 {
        self.phases
            .iter()
            .flat_map(|p| &p.poses)
            .map(|pose| i64::from(pose.duration_secs))
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Distribute resolved segments into ordered phases with position indices.
///
/// Pose positions are `segment_index * PHASE_POSITION_STRIDE + pose_index`,
/// strictly increasing within each phase.
pub fn assemble(
    title: impl Into<String>,
    description: Option<String>,
    params: &GenerationParams,
    ai_generated: bool,
    segments: Vec<ResolvedSegment>,
) -> AssembledSequence {
    let phases = segments
        .into_iter()
        .enumerate()
        .map(|(segment_index, segment)| AssembledPhase {
            carried_id: None,
            name: segment.name,
            description: Some(segment.description).filter(|d| !d.is_empty()),
            position: segment_index as i32,
            duration_minutes: segment.duration_minutes,
            intensity: segment.intensity,
            poses: segment
                .poses
                .into_iter()
                .enumerate()
                .map(|(pose_index, pose)| AssembledPose {
                    pose_id: pose.pose_id,
                    name: pose.name,
                    position: segment_index as i32 * PHASE_POSITION_STRIDE + pose_index as i32,
                    duration_secs: pose.duration_secs,
                    side: pose.side,
                    cues: pose.cues,
                })
                .collect(),
        })
        .collect();

    AssembledSequence {
        title: title.into(),
        description,
        duration_minutes: params.duration_minutes as i32,
        difficulty: params.difficulty,
        style: params.style,
        focus: params.focus,
        ai_generated,
        phases,
    }
}

/// Carry skeleton phase identifiers onto freshly assembled phases by
/// positional index.
///
/// Only the overlapping prefix of `min(skeleton.len(), phases.len())` phases
/// is carried; any remainder keeps fresh identity. Count mismatches never
/// error.
pub fn carry_phase_ids(skeleton: &[DbId], phases: &mut [AssembledPhase]) {
    for (phase, &id) in phases.iter_mut().zip(skeleton) {
        phase.carried_id = Some(id);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
