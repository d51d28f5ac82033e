//! Parsing and validation of LLM sequence output.
//!
//! Malformed output is a hard failure of that attempt: the error keeps the
//! raw text so callers can surface it for diagnosis and retry the whole
//! generation. No heuristic patching happens here.

use serde::Deserialize;

/// Duration substituted when the LLM omits a pose duration.
pub const DEFAULT_POSE_DURATION_SECS: i32 = 30;

/// Failure modes when interpreting LLM output.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("LLM output is not valid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("LLM output is missing required field '{field}'")]
    MissingField { field: &'static str, raw: String },

    #[error("LLM output contains no {what}")]
    Empty { what: &'static str, raw: String },
}

impl ParseError {
    /// The raw LLM text that failed to parse, for diagnosis.
    pub fn raw(&self) -> &str {
        match self {
            ParseError::InvalidJson { raw, .. }
            | ParseError::MissingField { raw, .. }
            | ParseError::Empty { raw, .. } => raw,
        }
    }
}

// ---------------------------------------------------------------------------
// Validated output
// ---------------------------------------------------------------------------

/// A validated sequence structure, with defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedStructure {
    pub title: String,
    pub description: String,
    pub intention: Option<String>,
    pub segments: Vec<GeneratedSegment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSegment {
    pub name: String,
    pub description: String,
    pub intensity: Option<String>,
    pub poses: Vec<SuggestedPose>,
}

/// One pose suggestion. Only `name` is mandatory in the LLM output; the
/// other fields carry documented defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestedPose {
    pub name: String,
    pub sanskrit_name: String,
    pub duration_secs: i32,
    /// `"left"`, `"right"`, `"both"`, or `""` for center.
    pub side: String,
    pub cues: String,
}

// ---------------------------------------------------------------------------
// Raw serde mirror (all optional, validated below)
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RawStructure {
    title: Option<String>,
    description: Option<String>,
    intention: Option<String>,
    segments: Option<Vec<RawSegment>>,
}

#[derive(Deserialize)]
struct RawSegment {
    name: Option<String>,
    description: Option<String>,
    intensity: Option<String>,
    poses: Option<Vec<RawPose>>,
}

#[derive(Deserialize)]
struct RawPose {
    name: Option<String>,
    sanskrit_name: Option<String>,
    duration_secs: Option<i32>,
    side: Option<String>,
    cues: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Strip an optional markdown code fence (with or without a `json` info
/// string) wrapping the payload. Returns the input unchanged when no fence
/// is present.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to and including the first newline.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse raw LLM output into a validated [`GeneratedStructure`].
///
/// Mandatory: top-level `title` and `description`, a non-empty `segments`
/// list, per-segment `name` and `description` with a non-empty `poses` list,
/// and a `name` per pose. Defaults for missing optional pose fields:
/// sanskrit name empty, duration [`DEFAULT_POSE_DURATION_SECS`], side empty
/// (center), cues empty.
pub fn parse_llm_sequence(raw: &str) -> Result<GeneratedStructure, ParseError> {
    let payload = strip_code_fences(raw);

    let parsed: RawStructure =
        serde_json::from_str(payload).map_err(|source| ParseError::InvalidJson {
            source,
            raw: raw.to_string(),
        })?;

    let missing = |field: &'static str| ParseError::MissingField {
        field,
        raw: raw.to_string(),
    };

    let title = parsed.title.ok_or_else(|| missing("title"))?;
    let description = parsed.description.ok_or_else(|| missing("description"))?;
    let segments = parsed.segments.ok_or_else(|| missing("segments"))?;
    if segments.is_empty() {
        return Err(ParseError::Empty {
            what: "segments",
            raw: raw.to_string(),
        });
    }

    let mut validated = Vec::with_capacity(segments.len());
    for segment in segments {
        let name = segment.name.ok_or_else(|| missing("segment.name"))?;
        let description = segment
            .description
            .ok_or_else(|| missing("segment.description"))?;
        let poses = segment.poses.ok_or_else(|| missing("segment.poses"))?;
        if poses.is_empty() {
            return Err(ParseError::Empty {
                what: "poses",
                raw: raw.to_string(),
            });
        }

        let mut validated_poses = Vec::with_capacity(poses.len());
        for pose in poses {
            validated_poses.push(SuggestedPose {
                name: pose.name.ok_or_else(|| missing("pose.name"))?,
                sanskrit_name: pose.sanskrit_name.unwrap_or_default(),
                duration_secs: pose.duration_secs.unwrap_or(DEFAULT_POSE_DURATION_SECS),
                side: pose.side.unwrap_or_default(),
                cues: pose.cues.unwrap_or_default(),
            });
        }

        validated.push(GeneratedSegment {
            name,
            description,
            intensity: segment.intensity,
            poses: validated_poses,
        });
    }

    Ok(GeneratedStructure {
        title,
        description,
        intention: parsed.intention,
        segments: validated,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
