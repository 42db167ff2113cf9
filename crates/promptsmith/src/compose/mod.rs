//! Unified prompt synthesis from enhanced framework output.
//!
//! Framework rewrites come back as loosely formatted Markdown. This module
//! recovers their structure on a best-effort basis:
//!
//! - [`extract`] — the `Rewritten Prompt` block and labeled field values
//!   (`Role`, `Audience`, `Context`, `Ask`, `Task`, `Tone`, `Format`, `Action`).
//! - [`normalize`] — markdown marker stripping, whitespace collapsing,
//!   list-marker removal.
//! - [`tone`] — tone/style phrases turned into a grammatical sentence.
//! - [`unified`] — [`compose()`], which orchestrates the above and never fails.
//!
//! Everything here is pure text transformation: no I/O, no shared mutable
//! state, safe to call from any thread.

pub mod extract;
pub mod normalize;
pub mod tone;
pub mod unified;

pub use extract::{Field, extract_field, extract_labeled_value, extract_rewritten_block};
pub use normalize::{clean_action, strip_markdown};
pub use tone::format_tone;
pub use unified::{
    ERROR_PREFIX, ExtractedFields, UNAVAILABLE_SENTINEL, UnifiedPrompt, compose, is_meaningful,
    synthesize,
};
