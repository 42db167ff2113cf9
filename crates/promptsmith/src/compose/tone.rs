//! Tone/style phrase to sentence conversion.

use regex::Regex;
use std::sync::LazyLock;

use super::normalize::{lowercase_first, strip_markdown};

static TONE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btone\b").expect("tone pattern is valid"));

static WITH_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bwith\b").expect("with pattern is valid"));

/// Turn a free-form tone phrase into a sentence.
///
/// Leading articles are dropped and the word "tone" is added unless the
/// phrase already contains it. A `with` clause is moved after "tone".
///
/// ```
/// use promptsmith::compose::format_tone;
///
/// assert_eq!(
///     format_tone("Professional yet approachable, with a focus on data-driven insights")
///         .as_deref(),
///     Some("Use a professional yet approachable tone with a focus on data-driven insights."),
/// );
/// assert_eq!(format_tone("a formal tone throughout").as_deref(), Some("Use formal tone throughout."));
/// ```
pub fn format_tone(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    let stripped = strip_markdown(text);
    if stripped.is_empty() {
        return None;
    }

    let mut tone = stripped.as_str();
    if let Some(last) = tone.chars().next_back()
        && (last == '.' || last.is_whitespace())
    {
        tone = tone.strip_suffix(last).unwrap_or(tone);
    }
    let tone = strip_article(tone);

    if TONE_WORD.is_match(tone) {
        return Some(format!("Use {tone}."));
    }

    let tone = lowercase_first(tone);
    if let Some(m) = WITH_WORD.find(&tone) {
        let (lead, rest) = tone.split_at(m.start());
        let tail = rest.strip_prefix("with").unwrap_or(rest).trim();
        let lead = lead.trim().trim_end_matches(|c: char| c == ',' || c.is_whitespace());
        return Some(format!("Use a {lead} tone with {tail}."));
    }
    Some(format!("Use a {tone} tone."))
}

/// Drop a leading "a " or "an " (case-insensitive).
fn strip_article(text: &str) -> &str {
    let trimmed = text.trim_start();
    for article in ["a ", "an "] {
        if let Some(prefix) = trimmed.get(..article.len())
            && prefix.eq_ignore_ascii_case(article)
        {
            return trimmed.get(article.len()..).map_or(trimmed, str::trim_start);
        }
    }
    text
}
