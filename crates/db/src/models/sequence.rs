//! Sequence entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yogaflow_core::types::{DbId, Timestamp};

use crate::models::phase::{CreatePhase, SequencePhase};
use crate::models::sequence_pose::SequencePose;

/// A row from the `sequences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sequence {
    pub id: DbId,
    /// External identity of the owner; `None` for anonymous trial sequences.
    pub user_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    /// Informational; not enforced against the sum of pose durations.
    pub duration_minutes: i32,
    pub difficulty: String,
    pub style: String,
    pub focus: String,
    pub ai_generated: bool,
    pub is_favorite: bool,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a sequence skeleton: metadata plus empty phases whose
/// identities survive later pose fills.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSequence {
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub difficulty: String,
    pub style: String,
    pub focus: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub phases: Vec<CreatePhase>,
}

/// DTO for updating sequence metadata. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSequence {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub difficulty: Option<String>,
    pub style: Option<String>,
    pub focus: Option<String>,
    pub is_favorite: Option<bool>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// A sequence with its phases and pose placements, as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct SequenceDetail {
    #[serde(flatten)]
    pub sequence: Sequence,
    pub phases: Vec<PhaseDetail>,
}

/// One phase with its pose placements in position order.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseDetail {
    #[serde(flatten)]
    pub phase: SequencePhase,
    pub poses: Vec<SequencePose>,
}
