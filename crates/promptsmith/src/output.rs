//! Markdown rendering and persistence of enhancement results.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

/// Render the saved document: the enhanced prompt, plus the unified prompt
/// section when one is given.
pub fn render_markdown(enhanced: &str, unified: Option<&str>) -> String {
    let mut doc = format!("# Enhanced Prompt\n\n{enhanced}");
    if let Some(unified) = unified {
        doc.push_str(&format!("\n\n# Unified Prompt\n\n{unified}\n"));
    }
    doc
}

/// File name for a result saved now: `enhanced_prompt_YYYYmmdd_HHMMSS.md`.
pub fn timestamped_file_name() -> String {
    format!(
        "enhanced_prompt_{}.md",
        Local::now().format("%Y%m%d_%H%M%S")
    )
}

/// Write `text` verbatim to a timestamped file under `dir`, creating the
/// directory if needed. Returns the written path.
pub fn save_markdown(dir: &Path, text: &str) -> Result<PathBuf, String> {
    fs::create_dir_all(dir)
        .map_err(|e| format!("failed to create output directory {}: {e}", dir.display()))?;

    let path = dir.join(timestamped_file_name());
    fs::write(&path, text).map_err(|e| format!("could not save file {}: {e}", path.display()))?;

    info!("Saved prompt to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_without_unified() {
        assert_eq!(
            render_markdown("**CoT**\n- step", None),
            "# Enhanced Prompt\n\n**CoT**\n- step"
        );
    }

    #[test]
    fn render_with_unified() {
        assert_eq!(
            render_markdown("body", Some("Act as a tutor.")),
            "# Enhanced Prompt\n\nbody\n\n# Unified Prompt\n\nAct as a tutor.\n"
        );
    }

    #[test]
    fn file_name_shape() {
        let name = timestamped_file_name();
        assert!(name.starts_with("enhanced_prompt_"), "{name}");
        assert!(name.ends_with(".md"), "{name}");
        // enhanced_prompt_ + 8 digits + _ + 6 digits + .md
        assert_eq!(name.len(), "enhanced_prompt_".len() + 15 + ".md".len());
    }

    #[test]
    fn save_creates_nested_dir_and_writes_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("out").join("nested");
        let text = "# Enhanced Prompt\n\nhello ✅\n";

        let path = save_markdown(&dir, text).unwrap();

        assert!(path.starts_with(&dir));
        assert_eq!(fs::read_to_string(&path).unwrap(), text);
    }

    #[test]
    fn save_fails_when_dir_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = save_markdown(&blocker, "text").unwrap_err();
        assert!(err.starts_with("failed to create output directory"), "{err}");
    }
}
