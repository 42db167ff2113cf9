//! Markdown noise removal for extracted field values.
//!
//! Model output wraps values in emphasis markers, backticks, and list
//! bullets. These helpers only touch leading and trailing runs; markdown in
//! the middle of a sentence is left alone.

use regex::Regex;
use std::sync::LazyLock;

/// One leading list marker: `1.` / `-` / `*` followed by whitespace.
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+\.|[-*])\s+").expect("list marker pattern is valid"));

fn is_markdown_noise(c: char) -> bool {
    matches!(c, '`' | '*' | '_') || c.is_whitespace()
}

/// Strip surrounding emphasis/code markers and collapse whitespace.
///
/// Leading and trailing runs of `` ` ``, `*`, `_` and whitespace are
/// removed, then every internal whitespace run (newlines included) becomes
/// a single space. Applying it twice yields the same result as once.
///
/// ```
/// use promptsmith::compose::strip_markdown;
///
/// assert_eq!(strip_markdown("**  a data   analyst**"), "a data analyst");
/// assert_eq!(strip_markdown("uses *light* emphasis_"), "uses *light* emphasis");
/// ```
pub fn strip_markdown(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let trimmed = text
        .trim()
        .trim_start_matches(is_markdown_noise)
        .trim_end_matches(is_markdown_noise);
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize an action line so it reads after "Be sure to".
///
/// Runs [`strip_markdown`], removes one leading list marker, and lowercases
/// the first character when it is uppercase.
pub fn clean_action(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let stripped = strip_markdown(text);
    let unlisted = LIST_MARKER.replace(&stripped, "");
    lowercase_first(&unlisted)
}

/// Lowercase the first character if it is uppercase; leave the rest alone.
pub(crate) fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => first.to_lowercase().chain(chars).collect(),
        _ => text.to_string(),
    }
}
