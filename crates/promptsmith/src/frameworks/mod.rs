//! Prompt-engineering frameworks: which ones apply, and what they are.
//!
//! - [`selector`] — keyword rule table mapping a user prompt to at most
//!   [`MAX_FRAMEWORKS`] framework names.
//! - [`catalog`] — [`FrameworkCatalog`] of [`FrameworkDef`] entries loaded
//!   from `frameworks.json` (or the bundled copy).

pub mod catalog;
pub mod selector;

pub use catalog::{FrameworkCatalog, FrameworkDef};
pub use selector::{
    DEFAULT_FRAMEWORK, MAX_FRAMEWORKS, RULES, SelectionRule, select_frameworks,
    select_frameworks_capped,
};
