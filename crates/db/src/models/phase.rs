//! Sequence phase entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yogaflow_core::types::{DbId, Timestamp};

/// A row from the `sequence_phases` table.
///
/// Phases belong to exactly one sequence; `position` determines presentation
/// order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SequencePhase {
    pub id: DbId,
    pub sequence_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
    /// Optional time budget in minutes.
    pub duration_minutes: Option<i32>,
    pub intensity: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a phase as part of a sequence skeleton.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePhase {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub intensity: Option<String>,
}
