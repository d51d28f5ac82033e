//! Repository for the `poses` catalog table.

use sqlx::PgPool;
use yogaflow_core::types::DbId;

use crate::models::pose::{CreatePose, Pose};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, sanskrit_name, category, difficulty, side_option, \
    benefits, contraindications, breath_cues, created_at";

/// Read access to the pose catalog, plus inserts for imports.
pub struct PoseRepo;

impl PoseRepo {
    /// Insert a catalog pose, returning the created row.
    ///
    /// If `side_option` is `None`, defaults to `none` (no sided variant).
    pub async fn create(pool: &PgPool, input: &CreatePose) -> Result<Pose, sqlx::Error> {
        let query = format!(
            "INSERT INTO poses
                (name, sanskrit_name, category, difficulty, side_option,
                 benefits, contraindications, breath_cues)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'none'), $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Pose>(&query)
            .bind(&input.name)
            .bind(&input.sanskrit_name)
            .bind(&input.category)
            .bind(&input.difficulty)
            .bind(&input.side_option)
            .bind(&input.benefits)
            .bind(&input.contraindications)
            .bind(&input.breath_cues)
            .fetch_one(pool)
            .await
    }

    /// Find a pose by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Pose>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM poses WHERE id = $1");
        sqlx::query_as::<_, Pose>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the entire catalog in insertion order.
    ///
    /// Catalog order is load-bearing: the pose matcher breaks ties and picks
    /// fallbacks by first-in-catalog order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Pose>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM poses ORDER BY id ASC");
        sqlx::query_as::<_, Pose>(&query).fetch_all(pool).await
    }
}
