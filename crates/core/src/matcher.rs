//! Mapping AI-suggested pose names onto canonical catalog entries.

use crate::assembler::{ResolvedPose, ResolvedSegment};
use crate::catalog::CatalogPose;
use crate::error::CoreError;
use crate::parser::GeneratedStructure;

/// Policy applied when a suggested name matches nothing in the catalog.
///
/// The substitution is deliberate: a generation request never fails because
/// the LLM invented a pose name, at the cost of occasionally inserting an
/// unrelated pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmatchedPosePolicy {
    /// Substitute the first entry of the unfiltered catalog.
    #[default]
    FirstInCatalog,
}

/// Find the catalog entry for an AI-suggested pose name.
///
/// Case-insensitive substring match of the first space-delimited token of
/// `suggested` against catalog English names ("Downward" matches
/// "Downward-Facing Dog"). Ties break on catalog order, first match wins.
/// Returns `None` only when the catalog is empty.
pub fn match_pose<'a>(
    suggested: &str,
    catalog: &'a [CatalogPose],
    policy: UnmatchedPosePolicy,
) -> Option<&'a CatalogPose> {
    let token = suggested
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();

    if !token.is_empty() {
        if let Some(found) = catalog
            .iter()
            .find(|pose| pose.name.to_lowercase().contains(&token))
        {
            return Some(found);
        }
    }

    match policy {
        UnmatchedPosePolicy::FirstInCatalog => catalog.first(),
    }
}

/// Resolve every suggestion in a parsed structure against the catalog.
///
/// Suggested durations and sides are kept; empty suggestion cues fall back
/// to the matched pose's breath instruction.
pub fn resolve_structure(
    structure: &GeneratedStructure,
    catalog: &[CatalogPose],
    policy: UnmatchedPosePolicy,
) -> Result<Vec<ResolvedSegment>, CoreError> {
    if catalog.is_empty() {
        return Err(CoreError::Internal(
            "Cannot resolve poses against an empty catalog".to_string(),
        ));
    }

    let mut segments = Vec::with_capacity(structure.segments.len());
    for segment in &structure.segments {
        let mut poses = Vec::with_capacity(segment.poses.len());
        for suggestion in &segment.poses {
            let matched = match_pose(&suggestion.name, catalog, policy).ok_or_else(|| {
                CoreError::Internal("Pose matching failed on a non-empty catalog".to_string())
            })?;

            let cues = if suggestion.cues.is_empty() {
                matched.breath_cues.clone().unwrap_or_default()
            } else {
                suggestion.cues.clone()
            };

            poses.push(ResolvedPose {
                pose_id: matched.id,
                name: matched.name.clone(),
                duration_secs: suggestion.duration_secs,
                side: suggestion.side.clone(),
                cues,
            });
        }
        segments.push(ResolvedSegment {
            name: segment.name.clone(),
            description: segment.description.clone(),
            intensity: segment.intensity.clone(),
            duration_minutes: None,
            poses,
        });
    }
    Ok(segments)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
