//! Per-framework prompt rewriting.
//!
//! For every selected framework the [`Rewriter`] sends one instruction to the
//! [`Provider`], wraps each answer under a bold `**NAME**` heading, and joins
//! the sections into the enhanced text the composer consumes. A framework
//! whose call fails is logged and skipped; only an empty overall result is an
//! error.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::api::provider::Provider;
use crate::api::retry::{RetryConfig, generate_with_retry};
use crate::frameworks::{FrameworkCatalog, FrameworkDef};

static BOLD_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([A-Z]+)\*\*").expect("bold heading regex is valid"));

static HASH_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#+\s*\*\*([A-Z]+)\*\*").expect("hash heading regex is valid")
});

/// Build the instruction sent to the model for one framework.
pub fn framework_instruction(name: &str, def: Option<&FrameworkDef>, user_prompt: &str) -> String {
    let description = match def {
        Some(def) => format!(
            "- **{name}**: {} (Example: {})",
            def.description, def.example
        ),
        None => format!("- **{name}**: No definition."),
    };
    format!(
        "You are an expert prompt engineer.\n\
         Apply the following framework to rewrite the user's prompt.\n\n\
         {description}\n\n\
         User prompt:\n{user_prompt}\n\n\
         Output a clearly labeled **{name}** section with Markdown bullets."
    )
}

/// Collapse back-to-back repeats of the same bold all-caps heading, turn
/// `## **NAME**` headings into plain `**NAME**`, and trim.
pub fn clean_duplicate_headings(text: &str) -> String {
    let mut repeats: Vec<Range<usize>> = Vec::new();
    let mut previous: Option<(&str, usize)> = None;

    for caps in BOLD_HEADING.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if let Some((prev_name, prev_end)) = previous
            && prev_name == name.as_str()
            && text
                .get(prev_end..whole.start())
                .is_some_and(|gap| gap.trim().is_empty())
        {
            repeats.push(prev_end..whole.end());
        }
        previous = Some((name.as_str(), whole.end()));
    }

    let mut deduped = String::with_capacity(text.len());
    let mut cursor = 0;
    for range in repeats {
        deduped.push_str(text.get(cursor..range.start).unwrap_or_default());
        cursor = range.end;
    }
    deduped.push_str(text.get(cursor..).unwrap_or_default());

    HASH_HEADING
        .replace_all(&deduped, "**${1}**")
        .trim()
        .to_string()
}

/// Rewrites a prompt under a list of frameworks.
///
/// ```ignore
/// let enhanced = Rewriter::new(&client, &catalog)
///     .with_retry(RetryConfig::with_retries(2))
///     .rewrite("Plan a product launch", &frameworks)
///     .await?;
/// ```
pub struct Rewriter<'a> {
    provider: &'a dyn Provider,
    catalog: &'a FrameworkCatalog,
    retry: RetryConfig,
}

impl<'a> Rewriter<'a> {
    pub fn new(provider: &'a dyn Provider, catalog: &'a FrameworkCatalog) -> Self {
        Self {
            provider,
            catalog,
            retry: RetryConfig::default(),
        }
    }

    /// Retry transient provider failures with this policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Run one model call per framework, in order, and join the sections.
    pub async fn rewrite(&self, user_prompt: &str, frameworks: &[String]) -> Result<String, String> {
        let mut sections = Vec::with_capacity(frameworks.len());

        for name in frameworks {
            let def = self.catalog.get(name);
            if def.is_none() {
                debug!("No definition for framework {name}");
            }
            let instruction = framework_instruction(name, def, user_prompt);

            match generate_with_retry(&self.retry, self.provider, &instruction).await {
                Ok(output) if !output.trim().is_empty() => {
                    debug!("Framework {name}: {} chars", output.len());
                    sections.push(format!("**{name}**\n{}\n", output.trim()));
                }
                Ok(_) => debug!("Framework {name}: empty output, skipped"),
                Err(e) => warn!("Could not generate using {name}: {e}"),
            }
        }

        let enhanced = clean_duplicate_headings(&sections.join("\n\n"));
        if enhanced.is_empty() {
            return Err("empty response from model".to_string());
        }
        Ok(enhanced)
    }
}

/// Rewrite `user_prompt` under each framework without retries.
pub async fn rewrite_prompt(
    provider: &dyn Provider,
    catalog: &FrameworkCatalog,
    user_prompt: &str,
    frameworks: &[String],
) -> Result<String, String> {
    Rewriter::new(provider, catalog)
        .rewrite(user_prompt, frameworks)
        .await
}
