//! End-to-end enhancement: select, rewrite, compose.

use tracing::{debug, info};

use crate::api::provider::Provider;
use crate::api::retry::RetryConfig;
use crate::compose::{compose, is_meaningful};
use crate::frameworks::{FrameworkCatalog, select_frameworks_capped};
use crate::output::render_markdown;
use crate::rewrite::Rewriter;

/// Result of one enhancement run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enhancement {
    /// The prompt as entered (trimmed).
    pub user_prompt: String,
    /// Frameworks applied, in selection order.
    pub frameworks: Vec<String>,
    /// Joined per-framework rewrites.
    pub enhanced: String,
    /// Composer output: a unified prompt, the sentinel, or an error string.
    pub unified: String,
}

impl Enhancement {
    /// Whether the unified prompt should be shown and saved.
    ///
    /// A single framework's output already is the unified prompt, so it is
    /// only shown when more than one framework contributed.
    pub fn show_unified(&self) -> bool {
        is_meaningful(&self.unified) && self.frameworks.len() > 1
    }

    /// Markdown document for saving.
    pub fn to_markdown(&self) -> String {
        let unified = self.show_unified().then_some(self.unified.as_str());
        render_markdown(&self.enhanced, unified)
    }
}

/// Enhance `user_prompt` with up to `max_frameworks` frameworks, no retries.
pub async fn enhance(
    provider: &dyn Provider,
    catalog: &FrameworkCatalog,
    user_prompt: &str,
    max_frameworks: usize,
) -> Result<Enhancement, String> {
    enhance_with_retry(
        provider,
        catalog,
        user_prompt,
        max_frameworks,
        &RetryConfig::default(),
    )
    .await
}

/// Like [`enhance`], retrying transient provider failures per `retry`.
pub async fn enhance_with_retry(
    provider: &dyn Provider,
    catalog: &FrameworkCatalog,
    user_prompt: &str,
    max_frameworks: usize,
    retry: &RetryConfig,
) -> Result<Enhancement, String> {
    let user_prompt = user_prompt.trim();
    if user_prompt.is_empty() {
        return Err("empty prompt".to_string());
    }

    let frameworks = select_frameworks_capped(user_prompt, max_frameworks);
    info!("Selected frameworks: {}", frameworks.join(", "));

    let enhanced = Rewriter::new(provider, catalog)
        .with_retry(retry.clone())
        .rewrite(user_prompt, &frameworks)
        .await?;

    let unified = compose(&enhanced);
    debug!("Unified prompt: {} chars", unified.len());

    Ok(Enhancement {
        user_prompt: user_prompt.to_string(),
        frameworks,
        enhanced,
        unified,
    })
}
