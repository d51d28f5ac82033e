//! Read-only view of the pose catalog consumed by the generation pipeline.
//!
//! The full database row lives in `yogaflow-db`; this crate only sees the
//! fields matching and assembly need.

use serde::Serialize;

use crate::params::Difficulty;
use crate::types::DbId;

/// Whether a pose is performed on one or both sides of the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SideOption {
    /// No side distinction (e.g. Mountain Pose).
    #[default]
    None,
    /// Performed once per side, left and right.
    LeftRight,
    /// Performed with both sides simultaneously engaged.
    Both,
}

impl SideOption {
    /// Database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SideOption::None => "none",
            SideOption::LeftRight => "left_right",
            SideOption::Both => "both",
        }
    }

    /// Parse the database representation. Unknown values map to `None`,
    /// keeping catalog reads infallible.
    pub fn parse(s: &str) -> Self {
        match s {
            "left_right" => SideOption::LeftRight,
            "both" => SideOption::Both,
            _ => SideOption::None,
        }
    }
}

/// One catalog entry as seen by the matcher and assemblers.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogPose {
    pub id: DbId,
    /// English name, the matching key.
    pub name: String,
    pub sanskrit_name: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub side_option: SideOption,
    /// Breath instruction used as a default teaching cue.
    pub breath_cues: Option<String>,
}
