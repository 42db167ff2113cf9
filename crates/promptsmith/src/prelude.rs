//! Convenience re-exports for common usage.
//!
//! ```ignore
//! use promptsmith::prelude::*;
//! ```

pub use crate::OllamaClient;
pub use crate::api::{FnProvider, Provider, RetryConfig, build_provider};
pub use crate::compose::{compose, is_meaningful};
pub use crate::config::EnhancerConfig;
pub use crate::frameworks::{FrameworkCatalog, FrameworkDef, select_frameworks};
pub use crate::output::{render_markdown, save_markdown};
pub use crate::pipeline::{Enhancement, enhance, enhance_with_retry};
pub use crate::rewrite::{Rewriter, rewrite_prompt};
