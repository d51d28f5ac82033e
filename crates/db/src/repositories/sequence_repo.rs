//! Repository for the `sequences` table and whole-sequence writes.
//!
//! Generated sequences span three tables (sequence, phases, pose
//! placements). Every multi-row write here runs inside one transaction:
//! either the whole sequence lands or nothing does.

use sqlx::{PgConnection, PgPool};
use yogaflow_core::assembler::{AssembledPhase, AssembledSequence};
use yogaflow_core::types::DbId;

use crate::models::phase::{CreatePhase, SequencePhase};
use crate::models::sequence::{CreateSequence, PhaseDetail, Sequence, SequenceDetail, UpdateSequence};
use crate::models::sequence_pose::SequencePose;
use crate::repositories::sequence_pose_repo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, description, duration_minutes, difficulty, \
    style, focus, ai_generated, is_favorite, notes, tags, created_at, updated_at";

const PHASE_COLUMNS: &str =
    "id, sequence_id, name, description, position, duration_minutes, intensity, created_at";

/// CRUD and transactional assembly writes for sequences.
pub struct SequenceRepo;

impl SequenceRepo {
    // -- Reads ---------------------------------------------------------------

    /// Find a sequence row by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Sequence>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sequences WHERE id = $1");
        sqlx::query_as::<_, Sequence>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a sequence with its phases and pose placements, both in position
    /// order.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SequenceDetail>, sqlx::Error> {
        let Some(sequence) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let phase_query = format!(
            "SELECT {PHASE_COLUMNS} FROM sequence_phases
             WHERE sequence_id = $1
             ORDER BY position ASC"
        );
        let phases = sqlx::query_as::<_, SequencePhase>(&phase_query)
            .bind(id)
            .fetch_all(pool)
            .await?;

        let pose_query = format!(
            "SELECT {} FROM sequence_poses
             WHERE sequence_id = $1
             ORDER BY position ASC",
            sequence_pose_repo::COLUMNS
        );
        let poses = sqlx::query_as::<_, SequencePose>(&pose_query)
            .bind(id)
            .fetch_all(pool)
            .await?;

        let phases = phases
            .into_iter()
            .map(|phase| {
                let mine = poses
                    .iter()
                    .filter(|p| p.phase_id == phase.id)
                    .cloned()
                    .collect();
                PhaseDetail {
                    phase,
                    poses: mine,
                }
            })
            .collect();

        Ok(Some(SequenceDetail { sequence, phases }))
    }

    /// List all sequences owned by a user, newest first. Row data only; no
    /// phases or poses.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Sequence>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sequences
             WHERE user_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Sequence>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    // -- Metadata writes -----------------------------------------------------

    /// Update sequence metadata. Only non-`None` fields in `input` are
    /// applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSequence,
    ) -> Result<Option<Sequence>, sqlx::Error> {
        let query = format!(
            "UPDATE sequences SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                duration_minutes = COALESCE($4, duration_minutes),
                difficulty = COALESCE($5, difficulty),
                style = COALESCE($6, style),
                focus = COALESCE($7, focus),
                is_favorite = COALESCE($8, is_favorite),
                notes = COALESCE($9, notes),
                tags = COALESCE($10, tags),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sequence>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.duration_minutes)
            .bind(&input.difficulty)
            .bind(&input.style)
            .bind(&input.focus)
            .bind(input.is_favorite)
            .bind(&input.notes)
            .bind(input.tags.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Delete a sequence by ID. Phases and pose placements cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sequences WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- Whole-sequence writes -----------------------------------------------

    /// Persist a freshly assembled sequence: the sequence row, its phases,
    /// and every pose placement, in one transaction.
    pub async fn create_full(
        pool: &PgPool,
        user_id: Option<DbId>,
        assembled: &AssembledSequence,
    ) -> Result<SequenceDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let sequence = insert_sequence_row(&mut tx, user_id, assembled).await?;
        let mut phases = Vec::with_capacity(assembled.phases.len());
        for phase in &assembled.phases {
            let row = insert_phase_row(&mut tx, sequence.id, phase).await?;
            let poses = insert_pose_rows(&mut tx, sequence.id, row.id, phase).await?;
            phases.push(PhaseDetail { phase: row, poses });
        }

        tx.commit().await?;
        Ok(SequenceDetail { sequence, phases })
    }

    /// Persist a sequence skeleton: metadata plus empty phases, positions
    /// assigned in input order. Pose placements come later via [`Self::refill`].
    pub async fn create_skeleton(
        pool: &PgPool,
        user_id: Option<DbId>,
        input: &CreateSequence,
    ) -> Result<SequenceDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let seq_query = format!(
            "INSERT INTO sequences
                (user_id, title, description, duration_minutes, difficulty,
                 style, focus, ai_generated, notes, tags)
             VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, $8, $9)
             RETURNING {COLUMNS}"
        );
        let sequence = sqlx::query_as::<_, Sequence>(&seq_query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.duration_minutes)
            .bind(&input.difficulty)
            .bind(&input.style)
            .bind(&input.focus)
            .bind(&input.notes)
            .bind(&input.tags)
            .fetch_one(&mut *tx)
            .await?;

        let mut phases = Vec::with_capacity(input.phases.len());
        for (position, phase) in input.phases.iter().enumerate() {
            let row = insert_skeleton_phase(&mut tx, sequence.id, position as i32, phase).await?;
            phases.push(PhaseDetail {
                phase: row,
                poses: Vec::new(),
            });
        }

        tx.commit().await?;
        Ok(SequenceDetail { sequence, phases })
    }

    /// Replace the contents of an existing sequence with a fresh assembly,
    /// in one transaction.
    ///
    /// Phases whose `carried_id` matches an existing phase of this sequence
    /// are updated in place and keep their identity; the rest are inserted
    /// fresh. Phases not present in the assembly are deleted, as are all
    /// prior pose placements.
    ///
    /// Returns `None` if the sequence does not exist.
    pub async fn refill(
        pool: &PgPool,
        id: DbId,
        assembled: &AssembledSequence,
    ) -> Result<Option<SequenceDetail>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let seq_query = format!(
            "UPDATE sequences SET
                title = $2,
                description = $3,
                duration_minutes = $4,
                difficulty = $5,
                style = $6,
                focus = $7,
                ai_generated = $8,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(sequence) = sqlx::query_as::<_, Sequence>(&seq_query)
            .bind(id)
            .bind(&assembled.title)
            .bind(&assembled.description)
            .bind(assembled.duration_minutes)
            .bind(assembled.difficulty.as_str())
            .bind(assembled.style.as_str())
            .bind(assembled.focus.as_str())
            .bind(assembled.ai_generated)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM sequence_poses WHERE sequence_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let mut phases = Vec::with_capacity(assembled.phases.len());
        let mut kept_ids = Vec::with_capacity(assembled.phases.len());
        for phase in &assembled.phases {
            let row = match phase.carried_id {
                Some(phase_id) => {
                    match update_phase_row(&mut tx, id, phase_id, phase).await? {
                        Some(row) => row,
                        // Stale carry-over (phase deleted underneath us):
                        // fall back to a fresh insert.
                        None => insert_phase_row(&mut tx, id, phase).await?,
                    }
                }
                None => insert_phase_row(&mut tx, id, phase).await?,
            };
            kept_ids.push(row.id);
            let poses = insert_pose_rows(&mut tx, id, row.id, phase).await?;
            phases.push(PhaseDetail { phase: row, poses });
        }

        sqlx::query("DELETE FROM sequence_phases WHERE sequence_id = $1 AND NOT (id = ANY($2))")
            .bind(id)
            .bind(&kept_ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(SequenceDetail { sequence, phases }))
    }
}

// ---------------------------------------------------------------------------
// Transaction-scoped helpers
// ---------------------------------------------------------------------------

async fn insert_sequence_row(
    conn: &mut PgConnection,
    user_id: Option<DbId>,
    assembled: &AssembledSequence,
) -> Result<Sequence, sqlx::Error> {
    let query = format!(
        "INSERT INTO sequences
            (user_id, title, description, duration_minutes, difficulty,
             style, focus, ai_generated)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, Sequence>(&query)
        .bind(user_id)
        .bind(&assembled.title)
        .bind(&assembled.description)
        .bind(assembled.duration_minutes)
        .bind(assembled.difficulty.as_str())
        .bind(assembled.style.as_str())
        .bind(assembled.focus.as_str())
        .bind(assembled.ai_generated)
        .fetch_one(conn)
        .await
}

async fn insert_phase_row(
    conn: &mut PgConnection,
    sequence_id: DbId,
    phase: &AssembledPhase,
) -> Result<SequencePhase, sqlx::Error> {
    let query = format!(
        "INSERT INTO sequence_phases
            (sequence_id, name, description, position, duration_minutes, intensity)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {PHASE_COLUMNS}"
    );
    sqlx::query_as::<_, SequencePhase>(&query)
        .bind(sequence_id)
        .bind(&phase.name)
        .bind(&phase.description)
        .bind(phase.position)
        .bind(phase.duration_minutes)
        .bind(&phase.intensity)
        .fetch_one(conn)
        .await
}

async fn insert_skeleton_phase(
    conn: &mut PgConnection,
    sequence_id: DbId,
    position: i32,
    phase: &CreatePhase,
) -> Result<SequencePhase, sqlx::Error> {
    let query = format!(
        "INSERT INTO sequence_phases
            (sequence_id, name, description, position, duration_minutes, intensity)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {PHASE_COLUMNS}"
    );
    sqlx::query_as::<_, SequencePhase>(&query)
        .bind(sequence_id)
        .bind(&phase.name)
        .bind(&phase.description)
        .bind(position)
        .bind(phase.duration_minutes)
        .bind(&phase.intensity)
        .fetch_one(conn)
        .await
}

/// Update a carried-over phase in place. Scoped to the sequence so a stray
/// `carried_id` can never touch another sequence's phase.
async fn update_phase_row(
    conn: &mut PgConnection,
    sequence_id: DbId,
    phase_id: DbId,
    phase: &AssembledPhase,
) -> Result<Option<SequencePhase>, sqlx::Error> {
    let query = format!(
        "UPDATE sequence_phases SET
            name = $3,
            description = $4,
            position = $5,
            duration_minutes = $6,
            intensity = $7
         WHERE id = $1 AND sequence_id = $2
         RETURNING {PHASE_COLUMNS}"
    );
    sqlx::query_as::<_, SequencePhase>(&query)
        .bind(phase_id)
        .bind(sequence_id)
        .bind(&phase.name)
        .bind(&phase.description)
        .bind(phase.position)
        .bind(phase.duration_minutes)
        .bind(&phase.intensity)
        .fetch_optional(conn)
        .await
}

async fn insert_pose_rows(
    conn: &mut PgConnection,
    sequence_id: DbId,
    phase_id: DbId,
    phase: &AssembledPhase,
) -> Result<Vec<SequencePose>, sqlx::Error> {
    let query = format!(
        "INSERT INTO sequence_poses
            (sequence_id, phase_id, pose_id, position, duration_secs, side, cues)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {}",
        sequence_pose_repo::COLUMNS
    );
    let mut rows = Vec::with_capacity(phase.poses.len());
    for pose in &phase.poses {
        let row = sqlx::query_as::<_, SequencePose>(&query)
            .bind(sequence_id)
            .bind(phase_id)
            .bind(pose.pose_id)
            .bind(pose.position)
            .bind(pose.duration_secs)
            .bind(&pose.side)
            .bind(&pose.cues)
            .fetch_one(&mut *conn)
            .await?;
        rows.push(row);
    }
    Ok(rows)
}
