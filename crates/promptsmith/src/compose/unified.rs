//! Unified prompt synthesis.
//!
//! [`compose`] turns enhanced multi-framework text into one directive. The
//! output comes from exactly one source, checked in order:
//!
//! 1. a `Rewritten Prompt` block, returned verbatim (trimmed);
//! 2. sentences built from labeled fields;
//! 3. the [`UNAVAILABLE_SENTINEL`] when neither yields anything.
//!
//! Internal faults never escape: they become an
//! `[ERROR in Unified Prompt Composer: ...]` string.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use super::extract::{Field, extract_field, extract_rewritten_block};
use super::normalize::{clean_action, strip_markdown};
use super::tone::format_tone;

/// Returned when no rewritten block and no usable field was found.
pub const UNAVAILABLE_SENTINEL: &str =
    "(Unable to synthesize unified prompt — missing identifiable fields.)";

/// Prefix of the string returned when synthesis fails internally.
pub const ERROR_PREFIX: &str = "[ERROR in Unified Prompt Composer: ";

/// Which path produced a unified prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnifiedPrompt {
    /// Content of a `Rewritten Prompt` block.
    Rewritten(String),
    /// Sentences assembled from labeled fields.
    Composed(String),
    /// Nothing could be synthesized.
    Unavailable,
}

impl UnifiedPrompt {
    /// Flatten to the displayable string.
    pub fn into_text(self) -> String {
        match self {
            UnifiedPrompt::Rewritten(text) | UnifiedPrompt::Composed(text) => text,
            UnifiedPrompt::Unavailable => UNAVAILABLE_SENTINEL.to_string(),
        }
    }
}

/// Normalized field values. `None` means absent; values are never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub role: Option<String>,
    pub audience: Option<String>,
    pub context: Option<String>,
    pub ask: Option<String>,
    pub task: Option<String>,
    pub tone: Option<String>,
    pub format: Option<String>,
    pub action: Option<String>,
}

impl ExtractedFields {
    /// Extract and normalize every field from `text`.
    pub fn from_text(text: &str) -> Result<Self, String> {
        let field = |f: Field| -> Result<Option<String>, String> {
            Ok(extract_field(text, f)?
                .map(|raw| match f {
                    Field::Action => clean_action(&raw),
                    _ => strip_markdown(&raw),
                })
                .filter(|value| !value.is_empty()))
        };
        Ok(Self {
            role: field(Field::Role)?,
            audience: field(Field::Audience)?,
            context: field(Field::Context)?,
            ask: field(Field::Ask)?,
            task: field(Field::Task)?,
            tone: field(Field::Tone)?,
            format: field(Field::Format)?,
            action: field(Field::Action)?,
        })
    }

    /// Number of fields present.
    pub fn count(&self) -> usize {
        [
            &self.role,
            &self.audience,
            &self.context,
            &self.ask,
            &self.task,
            &self.tone,
            &self.format,
            &self.action,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }

    /// Directive sentences in fixed order, one per present field.
    ///
    /// Ask takes precedence over Task; only one of them is emitted.
    pub fn sentences(&self) -> Vec<String> {
        let ask_or_task = self.ask.as_deref().or(self.task.as_deref());
        [
            sentence(self.role.as_deref(), |v| format!("Act as {v}.")),
            sentence(self.audience.as_deref(), |v| format!("Your audience is {v}.")),
            sentence(self.context.as_deref(), |v| format!("Context: {v}.")),
            sentence(ask_or_task, |v| format!("{v}.")),
            sentence(self.action.as_deref(), |v| format!("Be sure to {v}.")),
            sentence(self.format.as_deref(), |v| {
                format!("Deliver the output in this format: {v}.")
            }),
            self.tone.as_deref().and_then(format_tone),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Fill a template with a value whose trailing periods are removed.
///
/// A value made only of periods is skipped rather than rendered as an empty
/// sentence such as `"Context: ."`.
fn sentence(value: Option<&str>, template: impl Fn(&str) -> String) -> Option<String> {
    value
        .map(|v| v.trim_end_matches('.'))
        .filter(|v| !v.is_empty())
        .map(template)
}

/// Run synthesis and report which path produced the result.
pub fn synthesize(enhanced_text: &str) -> Result<UnifiedPrompt, String> {
    if let Some(block) = extract_rewritten_block(enhanced_text) {
        debug!("Unified prompt: using rewritten block ({} chars)", block.len());
        return Ok(UnifiedPrompt::Rewritten(block));
    }

    let fields = ExtractedFields::from_text(enhanced_text)?;
    debug!("Unified prompt: {} field(s) extracted", fields.count());

    let joined = fields.sentences().join(" ");
    let joined = joined.trim();
    if joined.is_empty() {
        Ok(UnifiedPrompt::Unavailable)
    } else {
        Ok(UnifiedPrompt::Composed(joined.to_string()))
    }
}

/// Synthesize a single unified prompt from enhanced text.
///
/// Always returns a displayable string: the unified prompt, the
/// [`UNAVAILABLE_SENTINEL`], or an error string starting with
/// [`ERROR_PREFIX`]. An internal panic is caught, but the installed panic
/// hook still prints it first.
///
/// ```
/// use promptsmith::compose::compose;
///
/// let enhanced = "\
/// - **Role:** a data analyst
/// - **Audience:** executives
/// - **Ask:** Summarize Q3 performance
/// - **Tone:** confident and concise";
///
/// assert_eq!(
///     compose(enhanced),
///     "Act as a data analyst. Your audience is executives. \
///      Summarize Q3 performance. Use a confident and concise tone."
/// );
/// ```
pub fn compose(enhanced_text: &str) -> String {
    guarded(|| synthesize(enhanced_text))
}

/// Flatten a synthesis attempt into a string, turning errors and panics into
/// an [`ERROR_PREFIX`] message.
///
/// The panic is still reported by the process panic hook (stderr by default)
/// before it is caught here.
fn guarded(attempt: impl FnOnce() -> Result<UnifiedPrompt, String>) -> String {
    match panic::catch_unwind(AssertUnwindSafe(attempt)) {
        Ok(Ok(unified)) => unified.into_text(),
        Ok(Err(e)) => {
            warn!("Unified prompt composer failed: {e}");
            format!("{ERROR_PREFIX}{e}]")
        }
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            warn!("Unified prompt composer panicked: {detail}");
            format!("{ERROR_PREFIX}{detail}]")
        }
    }
}

/// Whether a composed prompt is worth showing or saving.
///
/// The sentinel starts with `(`; empty output is not meaningful either.
pub fn is_meaningful(unified: &str) -> bool {
    !unified.is_empty() && !unified.starts_with('(')
}
