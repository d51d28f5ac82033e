//! Generation request parameters and their validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Hard ceiling on requested practice length.
pub const MAX_DURATION_MINUTES: u32 = 90;

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// Practice difficulty, also used to tag catalog poses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Wire/database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    /// Parse the wire/database representation (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }

    /// Whether a pose of `pose_difficulty` is allowed in a practice at this
    /// level.
    ///
    /// - Beginner requests only allow beginner poses.
    /// - Intermediate requests allow beginner and intermediate poses.
    /// - Advanced requests allow everything, including untagged poses.
    pub fn allows(self, pose_difficulty: Option<Difficulty>) -> bool {
        match self {
            Difficulty::Beginner => pose_difficulty == Some(Difficulty::Beginner),
            Difficulty::Intermediate => matches!(
                pose_difficulty,
                Some(Difficulty::Beginner) | Some(Difficulty::Intermediate)
            ),
            Difficulty::Advanced => true,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Yoga style of the requested practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Vinyasa,
    Hatha,
    Yin,
    Power,
    Restorative,
}

impl Style {
    /// Wire/database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Vinyasa => "vinyasa",
            Style::Hatha => "hatha",
            Style::Yin => "yin",
            Style::Power => "power",
            Style::Restorative => "restorative",
        }
    }

    /// Human-facing label used in titles and prompts.
    pub fn label(self) -> &'static str {
        match self {
            Style::Vinyasa => "Vinyasa",
            Style::Hatha => "Hatha",
            Style::Yin => "Yin",
            Style::Power => "Power",
            Style::Restorative => "Restorative",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Focus area
// ---------------------------------------------------------------------------

/// Body focus of the requested practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Focus {
    #[serde(rename = "full body")]
    FullBody,
    #[serde(rename = "upper body")]
    UpperBody,
    #[serde(rename = "lower body")]
    LowerBody,
    #[serde(rename = "core")]
    Core,
    #[serde(rename = "balance")]
    Balance,
    #[serde(rename = "flexibility")]
    Flexibility,
}

impl Focus {
    /// Wire/database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Focus::FullBody => "full body",
            Focus::UpperBody => "upper body",
            Focus::LowerBody => "lower body",
            Focus::Core => "core",
            Focus::Balance => "balance",
            Focus::Flexibility => "flexibility",
        }
    }

    /// Human-facing label used in titles and prompts.
    pub fn label(self) -> &'static str {
        match self {
            Focus::FullBody => "Full Body",
            Focus::UpperBody => "Upper Body",
            Focus::LowerBody => "Lower Body",
            Focus::Core => "Core",
            Focus::Balance => "Balance",
            Focus::Flexibility => "Flexibility",
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Generation parameters
// ---------------------------------------------------------------------------

/// Ephemeral input for one generation request. Not persisted.
///
/// Accepts both snake_case and the legacy camelCase field names on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationParams {
    #[serde(alias = "duration")]
    pub duration_minutes: u32,
    pub difficulty: Difficulty,
    pub style: Style,
    #[serde(alias = "focusArea", alias = "focus_area")]
    pub focus: Focus,
    #[serde(default, alias = "additionalNotes")]
    pub additional_notes: Option<String>,
    /// Optional pose the sequence should build toward.
    #[serde(default, alias = "peakPose")]
    pub peak_pose: Option<String>,
}

impl GenerationParams {
    /// Validate value ranges. Enum fields are already constrained by serde.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.duration_minutes == 0 {
            return Err(CoreError::Validation(
                "duration_minutes must be positive".to_string(),
            ));
        }
        if self.duration_minutes > MAX_DURATION_MINUTES {
            return Err(CoreError::Validation(format!(
                "duration_minutes must be at most {MAX_DURATION_MINUTES}"
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
