//! Sequence pose placement entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yogaflow_core::types::{DbId, Timestamp};

/// A row from the `sequence_poses` table: one placement of a catalog pose
/// within a phase.
///
/// Invariant: `position` is unique and monotonic within the containing phase
/// after any edit; the repository renumbers on every insert, delete, and
/// move.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SequencePose {
    pub id: DbId,
    pub sequence_id: DbId,
    pub phase_id: DbId,
    pub pose_id: DbId,
    pub position: i32,
    pub duration_secs: i32,
    /// `"left"`, `"right"`, `"both"`, or `""` for center.
    pub side: String,
    pub cues: String,
    pub transition: Option<String>,
    pub modifications: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for manually adding a pose placement to a phase.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSequencePose {
    pub pose_id: DbId,
    /// Insert position within the phase; appends when omitted.
    pub position: Option<i32>,
    /// Defaults to 30 if omitted.
    pub duration_secs: Option<i32>,
    pub side: Option<String>,
    pub cues: Option<String>,
    pub transition: Option<String>,
    pub modifications: Option<Vec<String>>,
}

/// DTO for editing a pose placement. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSequencePose {
    pub duration_secs: Option<i32>,
    pub side: Option<String>,
    pub cues: Option<String>,
    pub transition: Option<String>,
    pub modifications: Option<Vec<String>>,
}

/// DTO for drag-and-drop moves within or across phases.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveSequencePose {
    /// Target phase; stays in the current phase when omitted.
    pub to_phase_id: Option<DbId>,
    /// Target position within the destination phase.
    pub to_position: i32,
}
