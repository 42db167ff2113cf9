//! Field extraction from loosely formatted framework output.
//!
//! Two independent extractors operate on the immutable enhanced text:
//!
//! - [`extract_rewritten_block`] captures a dedicated `Rewritten Prompt`
//!   section, which supersedes everything else when present.
//! - [`extract_labeled_value`] finds the first `Label: value` line for a set
//!   of synonymous labels, tolerating bullets and bold markers.
//!
//! [`Field`] names the canonical fields and their label synonyms.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// `Rewritten Prompt` as a standalone line, optionally bold.
static REWRITTEN_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:\*\*)?Rewritten\s+Prompt(?:\*\*)?\s*$")
        .expect("rewritten header pattern is valid")
});

/// A Markdown heading, or a line holding only a bold single word.
static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*#|^\s*\*\*\w+\*\*\s*$").expect("section header pattern is valid")
});

/// Leading blockquote marker plus at most one following space.
static QUOTE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*>\s?").expect("quote marker pattern is valid"));

// ── Fields ─────────────────────────────────────────────────────────

/// Canonical fields recovered from enhanced text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Role,
    Audience,
    Context,
    Ask,
    Task,
    Tone,
    Format,
    Action,
}

impl Field {
    /// Every field, in composition order of extraction.
    pub const ALL: [Field; 8] = [
        Field::Role,
        Field::Audience,
        Field::Context,
        Field::Ask,
        Field::Task,
        Field::Tone,
        Field::Format,
        Field::Action,
    ];

    /// Labels accepted for this field (matched case-insensitively).
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Field::Role => &["Role", "Persona"],
            Field::Audience => &["Audience"],
            Field::Context => &["Context"],
            Field::Ask => &["Ask"],
            Field::Task => &["Task"],
            Field::Tone => &["Tone", "Style"],
            Field::Format => &["Format"],
            Field::Action => &["Action"],
        }
    }
}

// ── Rewritten Prompt block ─────────────────────────────────────────

/// Capture the body of a `Rewritten Prompt` section.
///
/// Capture starts after the header line and stops at the next Markdown
/// heading, a bold single-word line, or a blank line that is not preceded by
/// captured content. Blockquote markers are removed. Returns `None` when no
/// header exists or nothing was captured.
pub fn extract_rewritten_block(text: &str) -> Option<String> {
    let mut out: Vec<String> = Vec::new();
    let mut capturing = false;

    for line in text.lines() {
        if REWRITTEN_HEADER.is_match(line) {
            capturing = true;
            continue;
        }
        if !capturing {
            continue;
        }
        if SECTION_HEADER.is_match(line) {
            break;
        }
        if line.trim().starts_with('>') {
            out.push(QUOTE_MARKER.replace(line, "").trim_end().to_string());
        } else if !line.trim().is_empty() {
            out.push(line.trim_end().to_string());
        } else if out.last().is_some_and(|last| !last.is_empty()) {
            // One blank line is a paragraph break.
            out.push(String::new());
        } else {
            break;
        }
    }

    let block = out.join("\n").trim().to_string();
    (!block.is_empty()).then_some(block)
}

// ── Labeled values ─────────────────────────────────────────────────

/// Build the multiline pattern for a label alternation.
fn labeled_value_pattern(candidate_names: &[&str]) -> Result<Regex, String> {
    let label = candidate_names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"^(?:-\s*)?(?:\*\*)?(?:{label})(?:\*\*)?\s*[:\-]\s*(.+)$");
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
        .map_err(|e| format!("invalid label pattern for {candidate_names:?}: {e}"))
}

/// Find the value of the first line labeled with any of `candidate_names`.
///
/// Accepts an optional leading `-` bullet and optional `**` around the label,
/// then a `:` or `-` separator. The first match in the whole text wins.
///
/// ```
/// use promptsmith::compose::extract_labeled_value;
///
/// let text = "- **Persona:** a veteran editor\n- **Role:** ignored";
/// let value = extract_labeled_value(text, &["Role", "Persona"]).unwrap();
/// assert_eq!(value.as_deref(), Some("** a veteran editor"));
/// ```
pub fn extract_labeled_value(
    text: &str,
    candidate_names: &[&str],
) -> Result<Option<String>, String> {
    if candidate_names.is_empty() {
        return Ok(None);
    }
    let pattern = labeled_value_pattern(candidate_names)?;
    Ok(pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string()))
}

/// Shorthand for [`extract_labeled_value`] with a field's label synonyms.
pub fn extract_field(text: &str, field: Field) -> Result<Option<String>, String> {
    extract_labeled_value(text, field.labels())
}
