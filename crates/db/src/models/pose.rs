//! Pose catalog entity model.
//!
//! Reference data: read-only from the generation pipeline's perspective,
//! maintained out of band (seed migration / import scripts).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yogaflow_core::catalog::{CatalogPose, SideOption};
use yogaflow_core::params::Difficulty;
use yogaflow_core::types::{DbId, Timestamp};

/// A row from the `poses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Pose {
    pub id: DbId,
    pub name: String,
    pub sanskrit_name: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub side_option: String,
    pub benefits: Option<String>,
    pub contraindications: Option<String>,
    pub breath_cues: Option<String>,
    pub created_at: Timestamp,
}

impl Pose {
    /// The view consumed by the generation pipeline in `yogaflow-core`.
    pub fn to_catalog(&self) -> CatalogPose {
        CatalogPose {
            id: self.id,
            name: self.name.clone(),
            sanskrit_name: self.sanskrit_name.clone(),
            category: self.category.clone(),
            difficulty: self.difficulty.as_deref().and_then(Difficulty::parse),
            side_option: SideOption::parse(&self.side_option),
            breath_cues: self.breath_cues.clone(),
        }
    }
}

/// DTO for catalog imports.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePose {
    pub name: String,
    pub sanskrit_name: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    /// Defaults to `none` if omitted.
    pub side_option: Option<String>,
    pub benefits: Option<String>,
    pub contraindications: Option<String>,
    pub breath_cues: Option<String>,
}
