//! Prompt assembly for LLM-backed sequence and cue generation.
//!
//! Pure string templating; the actual API call lives in `yogaflow-llm`.

use std::fmt::Write;

use crate::assembler::PhaseOutline;
use crate::catalog::{CatalogPose, SideOption};
use crate::params::GenerationParams;

/// Number of catalog entries included in a sequence prompt. Keeps the prompt
/// within a predictable token budget on large catalogs.
pub const CATALOG_EXCERPT_LIMIT: usize = 50;

/// System prompt for sequence generation requests.
pub const SEQUENCE_SYSTEM_PROMPT: &str = "You are an experienced yoga teacher who designs \
    safe, well-structured pose sequences. You respond with a single JSON object and nothing else.";

/// System prompt for teaching-cue generation requests.
pub const CUE_SYSTEM_PROMPT: &str = "You are an experienced yoga teacher. You write short, \
    practical teaching cues in plain prose, two to three sentences, no markdown.";

/// Build the user prompt for one sequence generation request.
///
/// Embeds the request parameters, the sequencing guidelines, an annotated
/// excerpt of the pose catalog (first [`CATALOG_EXCERPT_LIMIT`] entries), the
/// required JSON response schema, and the hard constraints.
pub fn build_sequence_prompt(
    params: &GenerationParams,
    guidelines: &str,
    catalog: &[CatalogPose],
) -> String {
    let mut prompt = String::with_capacity(4096);

    let _ = writeln!(
        prompt,
        "Design a {}-minute {} yoga practice at {} level focused on {}.",
        params.duration_minutes,
        params.style.label(),
        params.difficulty,
        params.focus.label(),
    );
    if let Some(peak) = params.peak_pose.as_deref() {
        let _ = writeln!(
            prompt,
            "The practice should build toward {peak} as its peak pose."
        );
    }
    if let Some(notes) = params.additional_notes.as_deref() {
        let _ = writeln!(prompt, "Additional notes from the practitioner: {notes}");
    }

    prompt.push_str("\n## Sequencing guidelines\n\n");
    prompt.push_str(guidelines.trim());
    prompt.push('\n');

    prompt.push_str("\n## Allowed poses\n\n");
    for pose in catalog.iter().take(CATALOG_EXCERPT_LIMIT) {
        let _ = write!(prompt, "- {}", pose.name);
        if let Some(sanskrit) = pose.sanskrit_name.as_deref() {
            let _ = write!(prompt, " ({sanskrit})");
        }
        if let Some(category) = pose.category.as_deref() {
            let _ = write!(prompt, ", category: {category}");
        }
        if let Some(difficulty) = pose.difficulty {
            let _ = write!(prompt, ", difficulty: {difficulty}");
        }
        if pose.side_option == SideOption::LeftRight {
            prompt.push_str(", performed per side");
        }
        prompt.push('\n');
    }

    prompt.push_str(
        "\n## Response format\n\n\
        Respond with exactly one JSON object matching this schema, no prose, \
        no markdown fences:\n\
        {\n\
        \x20 \"title\": \"...\",\n\
        \x20 \"description\": \"...\",\n\
        \x20 \"segments\": [\n\
        \x20   {\n\
        \x20     \"name\": \"Warm Up\",\n\
        \x20     \"description\": \"...\",\n\
        \x20     \"poses\": [\n\
        \x20       {\"name\": \"...\", \"sanskrit_name\": \"...\", \"duration_secs\": 30, \
        \"side\": \"\", \"cues\": \"...\"}\n\
        \x20     ]\n\
        \x20   }\n\
        \x20 ]\n\
        }\n",
    );

    let _ = writeln!(
        prompt,
        "\n## Constraints\n\n\
        - Only use poses from the allowed pose list above, by their exact English name.\n\
        - The sum of pose durations must fit within {} minutes.\n\
        - Use \"left\" and \"right\" sides back to back for per-side poses, or \"\" when \
        the pose has no side.",
        params.duration_minutes
    );

    prompt
}

/// Build the user prompt for filling poses into a caller-defined structure.
///
/// Same as [`build_sequence_prompt`] plus a hard constraint pinning the
/// segment names and order to the given outline, so the parsed response maps
/// one-to-one onto existing phases.
pub fn build_fill_prompt(
    params: &GenerationParams,
    guidelines: &str,
    catalog: &[CatalogPose],
    outline: &[PhaseOutline],
) -> String {
    let mut prompt = build_sequence_prompt(params, guidelines, catalog);

    prompt.push_str("\n## Required structure\n\n");
    prompt.push_str(
        "The practitioner already designed the structure. Return exactly these \
        segments, with these names, in this order, filling in the poses:\n",
    );
    for phase in outline {
        let _ = write!(prompt, "- {}", phase.name);
        if let Some(minutes) = phase.duration_minutes {
            let _ = write!(prompt, " ({minutes} minutes)");
        }
        if let Some(description) = phase.description.as_deref() {
            let _ = write!(prompt, ": {description}");
        }
        prompt.push('\n');
    }

    prompt
}

/// Build the user prompt for one teaching-cue generation request.
pub fn build_cue_prompt(
    pose: &CatalogPose,
    side: Option<&str>,
    existing_cues: Option<&str>,
) -> String {
    let mut prompt = String::with_capacity(512);

    let _ = write!(prompt, "Write teaching cues for {}", pose.name);
    if let Some(sanskrit) = pose.sanskrit_name.as_deref() {
        let _ = write!(prompt, " ({sanskrit})");
    }
    match side {
        Some(s) if !s.is_empty() => {
            let _ = writeln!(prompt, ", performed on the {s} side.");
        }
        _ => prompt.push_str(".\n"),
    }
    if let Some(breath) = pose.breath_cues.as_deref() {
        let _ = writeln!(prompt, "Breath instruction for this pose: {breath}");
    }
    if let Some(existing) = existing_cues {
        if !existing.is_empty() {
            let _ = writeln!(
                prompt,
                "The teacher already uses these cues, write something complementary: {existing}"
            );
        }
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Difficulty, Focus, Style};

    fn pose(id: i64, name: &str) -> CatalogPose {
        CatalogPose {
            id,
            name: name.to_string(),
            sanskrit_name: Some("Asana".to_string()),
            category: Some("standing".to_string()),
            difficulty: Some(Difficulty::Beginner),
            side_option: SideOption::None,
            breath_cues: None,
        }
    }

    fn params() -> GenerationParams {
        GenerationParams {
            duration_minutes: 30,
            difficulty: Difficulty::Beginner,
            style: Style::Vinyasa,
            focus: Focus::FullBody,
            additional_notes: None,
            peak_pose: None,
        }
    }

    #[test]
    fn prompt_embeds_parameters_and_guidelines() {
        let catalog = vec![pose(1, "Mountain Pose")];
        let prompt = build_sequence_prompt(&params(), "Breathe with intention.", &catalog);

        assert!(prompt.contains("30-minute Vinyasa"));
        assert!(prompt.contains("beginner"));
        assert!(prompt.contains("Full Body"));
        assert!(prompt.contains("Breathe with intention."));
        assert!(prompt.contains("- Mountain Pose (Asana)"));
        assert!(prompt.contains("\"segments\""));
    }

    #[test]
    fn prompt_truncates_catalog_to_excerpt_limit() {
        let catalog: Vec<CatalogPose> = (0..80)
            .map(|i| pose(i, &format!("Pose Number{i}")))
            .collect();
        let prompt = build_sequence_prompt(&params(), "", &catalog);

        assert!(prompt.contains("Pose Number49"));
        assert!(!prompt.contains("Pose Number50"));
    }

    #[test]
    fn prompt_includes_peak_pose_when_set() {
        let mut p = params();
        p.peak_pose = Some("Crow Pose".to_string());
        let prompt = build_sequence_prompt(&p, "", &[pose(1, "Crow Pose")]);
        assert!(prompt.contains("build toward Crow Pose"));
    }

    #[test]
    fn fill_prompt_pins_the_outline() {
        let outline = vec![
            PhaseOutline {
                name: "Grounding".to_string(),
                description: Some("arrive on the mat".to_string()),
                duration_minutes: Some(5),
            },
            PhaseOutline {
                name: "Standing Flow".to_string(),
                description: None,
                duration_minutes: None,
            },
        ];
        let prompt = build_fill_prompt(&params(), "", &[pose(1, "Mountain Pose")], &outline);

        assert!(prompt.contains("Required structure"));
        assert!(prompt.contains("- Grounding (5 minutes): arrive on the mat"));
        assert!(prompt.contains("- Standing Flow\n"));
    }

    #[test]
    fn cue_prompt_mentions_side_and_existing_cues() {
        let p = pose(1, "Warrior II");
        let prompt = build_cue_prompt(&p, Some("left"), Some("soft gaze"));
        assert!(prompt.contains("Warrior II"));
        assert!(prompt.contains("left side"));
        assert!(prompt.contains("soft gaze"));
    }
}
