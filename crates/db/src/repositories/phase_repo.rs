//! Repository for the `sequence_phases` table.
//!
//! Phases are written by `SequenceRepo` as part of whole-sequence writes;
//! this repo only provides the reads the editor endpoints need.

use sqlx::PgPool;
use yogaflow_core::types::DbId;

use crate::models::phase::SequencePhase;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, sequence_id, name, description, position, duration_minutes, intensity, created_at";

/// Read access to sequence phases.
pub struct PhaseRepo;

impl PhaseRepo {
    /// Find a phase by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SequencePhase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sequence_phases WHERE id = $1");
        sqlx::query_as::<_, SequencePhase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all phases of a sequence, ordered by position ascending.
    pub async fn list_by_sequence(
        pool: &PgPool,
        sequence_id: DbId,
    ) -> Result<Vec<SequencePhase>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sequence_phases
             WHERE sequence_id = $1
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, SequencePhase>(&query)
            .bind(sequence_id)
            .fetch_all(pool)
            .await
    }
}
