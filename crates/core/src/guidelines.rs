//! Loader for the static sequencing guidelines embedded in LLM prompts.

use std::path::Path;

use crate::error::CoreError;

/// Guidelines shipped with the crate, used when no override file is
/// configured.
pub const DEFAULT_GUIDELINES: &str = include_str!("../assets/sequencing_guidelines.md");

/// Load the guideline text.
///
/// Reads `path` when given (so deployments can tune the instructional text
/// without rebuilding), otherwise returns the embedded default.
pub fn load(path: Option<&Path>) -> Result<String, CoreError> {
    match path {
        Some(p) => std::fs::read_to_string(p).map_err(|e| {
            CoreError::Internal(format!("Failed to read guidelines at {}: {e}", p.display()))
        }),
        None => Ok(DEFAULT_GUIDELINES.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_guidelines_are_embedded() {
        let text = load(None).unwrap();
        assert!(text.contains("Sequencing Guidelines"));
        assert!(text.len() > 200);
    }

    #[test]
    fn missing_override_file_is_an_error() {
        let err = load(Some(Path::new("/nonexistent/guidelines.md"))).unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }
}
