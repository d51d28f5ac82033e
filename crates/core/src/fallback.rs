//! Rule-based sequence assembly, used when no LLM is configured or an AI
//! fill attempt fails.
//!
//! The catalog is filtered by difficulty allowance and focus, a pose budget
//! is derived from the requested duration, and poses are distributed across
//! three fixed phases. The same "never fail the request" policy as the
//! matcher applies: a filter that leaves too few poses falls back to the
//! whole catalog.

use crate::assembler::{assemble, AssembledSequence, PhaseOutline, ResolvedPose, ResolvedSegment};
use crate::catalog::{CatalogPose, SideOption};
use crate::params::{Difficulty, Focus, GenerationParams};
use crate::parser::DEFAULT_POSE_DURATION_SECS;

/// Minimum pose budget for any generated sequence. A filtered catalog
/// smaller than this triggers the full-catalog fallback.
pub const MIN_POSE_BUDGET: usize = 6;

/// Fixed phases and their share of the pose budget and time budget.
pub const PHASE_SHARES: [(&str, f64); 3] = [
    ("Warm Up", 0.30),
    ("Main Sequence", 0.50),
    ("Cool Down", 0.20),
];

const PHASE_DESCRIPTIONS: [&str; 3] = [
    "Gentle movements to prepare the body",
    "The core work of the practice",
    "Slow down and release",
];

/// Filter the catalog by difficulty allowance and focus area.
///
/// Focus matches by category substring; a full-body request matches every
/// pose. When fewer than [`MIN_POSE_BUDGET`] poses remain, the entire
/// unfiltered catalog is returned instead, never an empty set.
pub fn filter_catalog(
    catalog: &[CatalogPose],
    difficulty: Difficulty,
    focus: Focus,
) -> Vec<&CatalogPose> {
    let filtered: Vec<&CatalogPose> = catalog
        .iter()
        .filter(|pose| difficulty.allows(pose.difficulty) && focus_matches(focus, pose))
        .collect();

    if filtered.len() < MIN_POSE_BUDGET {
        catalog.iter().collect()
    } else {
        filtered
    }
}

fn focus_matches(focus: Focus, pose: &CatalogPose) -> bool {
    match focus {
        Focus::FullBody => true,
        _ => pose
            .category
            .as_deref()
            .is_some_and(|category| category.to_lowercase().contains(focus.as_str())),
    }
}

/// Total pose budget for a practice: one pose per three minutes, floored,
/// at least [`MIN_POSE_BUDGET`].
pub fn pose_budget(duration_minutes: u32) -> usize {
    ((duration_minutes / 3) as usize).max(MIN_POSE_BUDGET)
}

/// Split the pose budget across the three phases (30% / 50% / 20%); the
/// cool-down takes the rounding remainder.
pub fn phase_counts(budget: usize) -> [usize; 3] {
    let warm = (budget as f64 * PHASE_SHARES[0].1).round() as usize;
    let main = (budget as f64 * PHASE_SHARES[1].1).round() as usize;
    [warm, main, budget.saturating_sub(warm + main)]
}

/// Build a complete sequence directly from the catalog, without the LLM.
pub fn build_fallback_sequence(
    params: &GenerationParams,
    catalog: &[CatalogPose],
) -> AssembledSequence {
    let pool = filter_catalog(catalog, params.difficulty, params.focus);
    let counts = phase_counts(pose_budget(params.duration_minutes));
    let phase_minutes = phase_minute_budgets(params.duration_minutes as i32);

    // Global cursor so consecutive phases draw different poses.
    let mut cursor = 0usize;
    let mut segments = Vec::with_capacity(PHASE_SHARES.len());

    for (phase_index, ((phase_name, _), count)) in PHASE_SHARES.iter().zip(counts).enumerate() {
        let minutes = phase_minutes[phase_index];
        let duration_secs = per_pose_duration(minutes, count);
        let mut poses = Vec::with_capacity(count);

        while poses.len() < count && !pool.is_empty() {
            let pose = pool[cursor % pool.len()];
            cursor += 1;

            if pose.side_option == SideOption::LeftRight {
                // Both sides back to back, left before right.
                poses.push(placement(pose, "left", duration_secs));
                if poses.len() < count {
                    poses.push(placement(pose, "right", duration_secs));
                }
            } else {
                poses.push(placement(pose, "", duration_secs));
            }
        }

        segments.push(ResolvedSegment {
            name: (*phase_name).to_string(),
            description: PHASE_DESCRIPTIONS[phase_index].to_string(),
            intensity: None,
            duration_minutes: Some(minutes),
            poses,
        });
    }

    let title = format!(
        "{}-Minute {} {}",
        params.duration_minutes,
        params.style.label(),
        params.focus.label(),
    );
    let description = format!(
        "A {} {} practice focusing on {}.",
        params.difficulty,
        params.style.label(),
        params.focus.label(),
    );

    assemble(title, Some(description), params, false, segments)
}

/// Rule-based fill of a caller-defined structure: the same pose pool and
/// budget as [`build_fallback_sequence`], but distributed across the given
/// outline instead of the three fixed phases.
///
/// The pose budget is split proportionally to the outline's phase minutes
/// when they are set, evenly otherwise; every phase gets at least one pose
/// (catalog permitting).
pub fn fill_outline(
    params: &GenerationParams,
    catalog: &[CatalogPose],
    outline: &[PhaseOutline],
) -> Vec<ResolvedSegment> {
    if outline.is_empty() {
        return Vec::new();
    }

    let pool = filter_catalog(catalog, params.difficulty, params.focus);
    let budget = pose_budget(params.duration_minutes);
    let minutes = outline_minute_budgets(params.duration_minutes as i32, outline);
    let counts = outline_counts(budget, &minutes);

    let mut cursor = 0usize;
    let mut segments = Vec::with_capacity(outline.len());

    for (phase_index, phase) in outline.iter().enumerate() {
        let phase_minutes = minutes[phase_index];
        let count = counts[phase_index];
        let duration_secs = per_pose_duration(phase_minutes, count);
        let mut poses = Vec::with_capacity(count);

        while poses.len() < count && !pool.is_empty() {
            let pose = pool[cursor % pool.len()];
            cursor += 1;

            if pose.side_option == SideOption::LeftRight {
                poses.push(placement(pose, "left", duration_secs));
                if poses.len() < count {
                    poses.push(placement(pose, "right", duration_secs));
                }
            } else {
                poses.push(placement(pose, "", duration_secs));
            }
        }

        segments.push(ResolvedSegment {
            name: phase.name.clone(),
            description: phase.description.clone().unwrap_or_default(),
            intensity: None,
            duration_minutes: Some(phase_minutes),
            poses,
        });
    }

    segments
}

/// Minutes per outline phase: the caller's numbers when every phase has
/// one, an even split of the total otherwise (last phase takes the
/// remainder).
fn outline_minute_budgets(total: i32, outline: &[PhaseOutline]) -> Vec<i32> {
    if outline.iter().all(|p| p.duration_minutes.is_some()) {
        return outline.iter().map(|p| p.duration_minutes.unwrap_or(0)).collect();
    }
    let n = outline.len() as i32;
    let even = total / n;
    let mut minutes = vec![even; outline.len()];
    if let Some(last) = minutes.last_mut() {
        *last = (total - even * (n - 1)).max(0);
    }
    minutes
}

/// Split the pose budget proportionally to phase minutes, at least one pose
/// per phase; the last phase takes the rounding remainder.
fn outline_counts(budget: usize, minutes: &[i32]) -> Vec<usize> {
    let total: i32 = minutes.iter().sum::<i32>().max(1);
    let mut counts: Vec<usize> = minutes
        .iter()
        .map(|&m| (((budget as f64) * f64::from(m) / f64::from(total)).round() as usize).max(1))
        .collect();

    let assigned: usize = counts.iter().take(counts.len() - 1).sum();
    if let Some(last) = counts.last_mut() {
        *last = budget.saturating_sub(assigned).max(1);
    }
    counts
}

fn placement(pose: &CatalogPose, side: &str, duration_secs: i32) -> ResolvedPose {
    ResolvedPose {
        pose_id: pose.id,
        name: pose.name.clone(),
        duration_secs,
        side: side.to_string(),
        cues: pose.breath_cues.clone().unwrap_or_default(),
    }
}

fn phase_minute_budgets(duration_minutes: i32) -> [i32; 3] {
    let warm = (f64::from(duration_minutes) * PHASE_SHARES[0].1).round() as i32;
    let main = (f64::from(duration_minutes) * PHASE_SHARES[1].1).round() as i32;
    [warm, main, (duration_minutes - warm - main).max(0)]
}

fn per_pose_duration(phase_minutes: i32, count: usize) -> i32 {
    if count == 0 || phase_minutes <= 0 {
        return DEFAULT_POSE_DURATION_SECS;
    }
    (phase_minutes * 60 / count as i32).max(DEFAULT_POSE_DURATION_SECS / 2)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Style;

    fn pose(id: i64, name: &str, difficulty: Difficulty, category: &str) -> CatalogPose {
        CatalogPose {
            id,
            name: name.to_string(),
            sanskrit_name: None,
            category: Some(category.to_string()),
            difficulty: Some(difficulty),
            side_option: SideOption::None,
            breath_cues: None,
        }
    }

    fn beginner_catalog(count: usize) -> Vec<CatalogPose> {
        (0..count as i64)
            .map(|i| pose(i + 1, &format!("Pose {i}"), Difficulty::Beginner, "standing"))
            .collect()
    }

    fn params(duration: u32, difficulty: Difficulty, focus: Focus) -> GenerationParams {
        GenerationParams {
            duration_minutes: duration,
            difficulty,
            style: Style::Vinyasa,
            focus,
            additional_notes: None,
            peak_pose: None,
        }
    }

    #[test]
    fn budget_is_one_pose_per_three_minutes() {
        assert_eq!(pose_budget(30), 10);
        assert_eq!(pose_budget(90), 30);
    }

    #[test]
    fn budget_has_a_floor_of_six() {
        assert_eq!(pose_budget(3), 6);
        assert_eq!(pose_budget(1), 6);
    }

    #[test]
    fn phase_counts_split_thirty_fifty_twenty() {
        assert_eq!(phase_counts(10), [3, 5, 2]);
        assert_eq!(phase_counts(6), [2, 3, 1]);
    }

    #[test]
    fn thirty_minute_beginner_scenario_yields_three_five_two() {
        let catalog = beginner_catalog(13);
        let sequence = build_fallback_sequence(
            &params(30, Difficulty::Beginner, Focus::FullBody),
            &catalog,
        );

        assert_eq!(sequence.phases.len(), 3);
        assert_eq!(sequence.phases[0].name, "Warm Up");
        assert_eq!(sequence.phases[1].name, "Main Sequence");
        assert_eq!(sequence.phases[2].name, "Cool Down");
        let counts: Vec<usize> = sequence.phases.iter().map(|p| p.poses.len()).collect();
        assert_eq!(counts, vec![3, 5, 2]);
        assert!(!sequence.ai_generated);
    }

    #[test]
    fn positions_increase_within_each_phase() {
        let catalog = beginner_catalog(13);
        let sequence = build_fallback_sequence(
            &params(30, Difficulty::Beginner, Focus::FullBody),
            &catalog,
        );
        for phase in &sequence.phases {
            for window in phase.poses.windows(2) {
                assert!(window[0].position < window[1].position);
            }
        }
    }

    #[test]
    fn sparse_filter_falls_back_to_entire_catalog() {
        // Only 2 beginner poses; the rest are advanced and excluded for a
        // beginner request, so the whole catalog must be used.
        let mut catalog = beginner_catalog(2);
        for i in 0..8i64 {
            catalog.push(pose(
                100 + i,
                &format!("Advanced {i}"),
                Difficulty::Advanced,
                "standing",
            ));
        }

        let pool = filter_catalog(&catalog, Difficulty::Beginner, Focus::FullBody);
        assert_eq!(pool.len(), catalog.len());

        let sequence = build_fallback_sequence(
            &params(30, Difficulty::Beginner, Focus::FullBody),
            &catalog,
        );
        assert_eq!(sequence.total_pose_count(), 10);
    }

    #[test]
    fn focus_filters_by_category_substring() {
        let mut catalog = beginner_catalog(6);
        for i in 0..6i64 {
            catalog.push(pose(
                200 + i,
                &format!("Core {i}"),
                Difficulty::Beginner,
                "core strength",
            ));
        }

        let pool = filter_catalog(&catalog, Difficulty::Beginner, Focus::Core);
        assert_eq!(pool.len(), 6);
        assert!(pool.iter().all(|p| p.category.as_deref() == Some("core strength")));
    }

    #[test]
    fn side_option_poses_are_inserted_back_to_back() {
        let mut catalog = beginner_catalog(4);
        catalog[0].side_option = SideOption::LeftRight;
        catalog[0].name = "Warrior II".to_string();

        let sequence = build_fallback_sequence(
            &params(30, Difficulty::Beginner, Focus::FullBody),
            &catalog,
        );

        let mut saw_pair = false;
        for phase in &sequence.phases {
            for window in phase.poses.windows(2) {
                if window[0].name == "Warrior II" && window[0].side == "left" {
                    assert_eq!(window[1].name, "Warrior II");
                    assert_eq!(window[1].side, "right");
                    saw_pair = true;
                }
            }
        }
        assert!(saw_pair, "expected a left/right pair of Warrior II");
    }

    fn outline(name: &str, minutes: Option<i32>) -> PhaseOutline {
        PhaseOutline {
            name: name.to_string(),
            description: None,
            duration_minutes: minutes,
        }
    }

    #[test]
    fn fill_outline_keeps_names_and_order() {
        let catalog = beginner_catalog(13);
        let segments = fill_outline(
            &params(30, Difficulty::Beginner, Focus::FullBody),
            &catalog,
            &[outline("Grounding", Some(10)), outline("Flow", Some(20))],
        );

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].name, "Grounding");
        assert_eq!(segments[1].name, "Flow");
        assert_eq!(segments[0].duration_minutes, Some(10));
        let total: usize = segments.iter().map(|s| s.poses.len()).sum();
        assert_eq!(total, pose_budget(30));
    }

    #[test]
    fn fill_outline_splits_budget_proportionally_to_minutes() {
        let catalog = beginner_catalog(13);
        let segments = fill_outline(
            &params(30, Difficulty::Beginner, Focus::FullBody),
            &catalog,
            &[outline("Short", Some(6)), outline("Long", Some(24))],
        );
        // Budget 10, 6/30 of it rounds to 2.
        assert_eq!(segments[0].poses.len(), 2);
        assert_eq!(segments[1].poses.len(), 8);
    }

    #[test]
    fn fill_outline_without_minutes_splits_evenly() {
        let catalog = beginner_catalog(13);
        let segments = fill_outline(
            &params(30, Difficulty::Beginner, Focus::FullBody),
            &catalog,
            &[
                outline("One", None),
                outline("Two", Some(10)),
                outline("Three", None),
            ],
        );
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].duration_minutes, Some(10));
        assert_eq!(segments[2].duration_minutes, Some(10));
        for segment in &segments {
            assert!(!segment.poses.is_empty());
        }
    }

    #[test]
    fn fill_outline_with_empty_outline_yields_nothing() {
        let catalog = beginner_catalog(13);
        let segments = fill_outline(
            &params(30, Difficulty::Beginner, Focus::FullBody),
            &catalog,
            &[],
        );
        assert!(segments.is_empty());
    }

    #[test]
    fn empty_catalog_yields_empty_phases() {
        let sequence =
            build_fallback_sequence(&params(30, Difficulty::Beginner, Focus::FullBody), &[]);
        assert_eq!(sequence.total_pose_count(), 0);
        assert_eq!(sequence.phases.len(), 3);
    }
}
