//! Repository for the `sequence_poses` table: the manual editor surface.
//!
//! Invariant: after any edit, positions within a phase are exactly
//! `0..n-1` in presentation order. Every insert, delete, and move runs in a
//! transaction that ends with a renumber of the touched phase(s).

use sqlx::{PgConnection, PgPool};
use yogaflow_core::types::DbId;

use crate::models::sequence_pose::{
    CreateSequencePose, MoveSequencePose, SequencePose, UpdateSequencePose,
};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, sequence_id, phase_id, pose_id, position, duration_secs, \
    side, cues, transition, modifications, created_at, updated_at";

/// CRUD and reordering operations for pose placements.
pub struct SequencePoseRepo;

impl SequencePoseRepo {
    /// Find a placement by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SequencePose>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sequence_poses WHERE id = $1");
        sqlx::query_as::<_, SequencePose>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all placements of a phase, ordered by position ascending.
    pub async fn list_by_phase(
        pool: &PgPool,
        phase_id: DbId,
    ) -> Result<Vec<SequencePose>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sequence_poses
             WHERE phase_id = $1
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, SequencePose>(&query)
            .bind(phase_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a placement into a phase.
    ///
    /// When `input.position` is given, existing placements at or after it
    /// shift down; otherwise the pose appends at the end. Returns `None` if
    /// the phase does not exist.
    pub async fn create(
        pool: &PgPool,
        phase_id: DbId,
        input: &CreateSequencePose,
    ) -> Result<Option<SequencePose>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(sequence_id) = phase_sequence_id(&mut tx, phase_id).await? else {
            return Ok(None);
        };

        let target = match input.position {
            Some(position) => {
                sqlx::query(
                    "UPDATE sequence_poses SET position = position + 1
                     WHERE phase_id = $1 AND position >= $2",
                )
                .bind(phase_id)
                .bind(position)
                .execute(&mut *tx)
                .await?;
                position
            }
            // Append: one past the current maximum.
            None => {
                let max: Option<i32> =
                    sqlx::query_scalar("SELECT MAX(position) FROM sequence_poses WHERE phase_id = $1")
                        .bind(phase_id)
                        .fetch_one(&mut *tx)
                        .await?;
                max.map_or(0, |m| m + 1)
            }
        };

        let query = format!(
            "INSERT INTO sequence_poses
                (sequence_id, phase_id, pose_id, position, duration_secs,
                 side, cues, transition, modifications)
             VALUES ($1, $2, $3, $4, COALESCE($5, 30),
                     COALESCE($6, ''), COALESCE($7, ''), $8, COALESCE($9, '{{}}'))
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, SequencePose>(&query)
            .bind(sequence_id)
            .bind(phase_id)
            .bind(input.pose_id)
            .bind(target)
            .bind(input.duration_secs)
            .bind(&input.side)
            .bind(&input.cues)
            .bind(&input.transition)
            .bind(input.modifications.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        renumber_phase(&mut tx, phase_id).await?;
        let row = refetch(&mut tx, row.id).await?;

        tx.commit().await?;
        Ok(Some(row))
    }

    /// Update a placement. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSequencePose,
    ) -> Result<Option<SequencePose>, sqlx::Error> {
        let query = format!(
            "UPDATE sequence_poses SET
                duration_secs = COALESCE($2, duration_secs),
                side = COALESCE($3, side),
                cues = COALESCE($4, cues),
                transition = COALESCE($5, transition),
                modifications = COALESCE($6, modifications),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SequencePose>(&query)
            .bind(id)
            .bind(input.duration_secs)
            .bind(&input.side)
            .bind(&input.cues)
            .bind(&input.transition)
            .bind(input.modifications.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Delete a placement and close the gap it leaves. Returns `true` if a
    /// row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let phase_id: Option<DbId> =
            sqlx::query_scalar("DELETE FROM sequence_poses WHERE id = $1 RETURNING phase_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(phase_id) = phase_id else {
            return Ok(false);
        };

        renumber_phase(&mut tx, phase_id).await?;
        tx.commit().await?;
        Ok(true)
    }

    /// Move a placement within its phase or into another phase of the same
    /// sequence. Both phases are renumbered.
    ///
    /// Returns `None` if the placement does not exist or the target phase
    /// belongs to a different sequence.
    pub async fn move_pose(
        pool: &PgPool,
        id: DbId,
        input: &MoveSequencePose,
    ) -> Result<Option<SequencePose>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(row) = refetch_optional(&mut tx, id).await? else {
            return Ok(None);
        };

        let dest_phase = input.to_phase_id.unwrap_or(row.phase_id);
        if dest_phase != row.phase_id {
            match phase_sequence_id(&mut tx, dest_phase).await? {
                Some(sequence_id) if sequence_id == row.sequence_id => {}
                _ => return Ok(None),
            }
        }

        // Make room at the target slot, then drop the row into it.
        sqlx::query(
            "UPDATE sequence_poses SET position = position + 1
             WHERE phase_id = $1 AND position >= $2 AND id <> $3",
        )
        .bind(dest_phase)
        .bind(input.to_position)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE sequence_poses SET phase_id = $2, position = $3, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(dest_phase)
        .bind(input.to_position)
        .execute(&mut *tx)
        .await?;

        if dest_phase != row.phase_id {
            renumber_phase(&mut tx, row.phase_id).await?;
        }
        renumber_phase(&mut tx, dest_phase).await?;
        let row = refetch(&mut tx, id).await?;

        tx.commit().await?;
        Ok(Some(row))
    }
}

// ---------------------------------------------------------------------------
// Transaction-scoped helpers
// ---------------------------------------------------------------------------

/// Rewrite positions within a phase to exactly `0..n-1`, preserving the
/// current order (ties broken by id).
async fn renumber_phase(conn: &mut PgConnection, phase_id: DbId) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE sequence_poses sp
         SET position = ranked.rn - 1
         FROM (
             SELECT id, ROW_NUMBER() OVER (ORDER BY position ASC, id ASC) AS rn
             FROM sequence_poses
             WHERE phase_id = $1
         ) ranked
         WHERE sp.id = ranked.id AND sp.position <> ranked.rn - 1",
    )
    .bind(phase_id)
    .execute(conn)
    .await?;
    Ok(())
}

async fn phase_sequence_id(
    conn: &mut PgConnection,
    phase_id: DbId,
) -> Result<Option<DbId>, sqlx::Error> {
    sqlx::query_scalar("SELECT sequence_id FROM sequence_phases WHERE id = $1")
        .bind(phase_id)
        .fetch_optional(conn)
        .await
}

async fn refetch(conn: &mut PgConnection, id: DbId) -> Result<SequencePose, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM sequence_poses WHERE id = $1");
    sqlx::query_as::<_, SequencePose>(&query)
        .bind(id)
        .fetch_one(conn)
        .await
}

async fn refetch_optional(
    conn: &mut PgConnection,
    id: DbId,
) -> Result<Option<SequencePose>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM sequence_poses WHERE id = $1");
    sqlx::query_as::<_, SequencePose>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await
}
