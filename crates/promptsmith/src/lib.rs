//! Prompt enhancement through prompt-engineering frameworks.
//!
//! `promptsmith` takes a plain user prompt, picks the prompt-engineering
//! frameworks that fit it (chain-of-thought, CRAFT, RTCO, ...), asks a
//! language model to rewrite the prompt under each one, and then synthesizes
//! a single unified prompt from the structured Markdown the model produced.
//!
//! # Getting started
//!
//! ```ignore
//! use promptsmith::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), String> {
//!     let config = EnhancerConfig::from_env()?;
//!     let provider = build_provider(&config)?;
//!     let catalog = config.load_catalog()?;
//!
//!     let result = enhance(
//!         provider.as_ref(),
//!         &catalog,
//!         "Write a blog post about our Q3 results",
//!         config.max_frameworks,
//!     )
//!     .await?;
//!
//!     println!("{}", result.enhanced);
//!     if result.show_unified() {
//!         println!("{}", result.unified);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Where to find things
//!
//! - **Synthesize a unified prompt from existing text:** [`compose::compose`].
//!   It never fails; it returns the unified prompt, a sentinel, or a labeled
//!   error string. Use [`compose::is_meaningful`] to decide whether to show it.
//! - **Choose frameworks:** [`frameworks::select_frameworks`] and the
//!   [`frameworks::FrameworkCatalog`] of definitions.
//! - **Talk to a model:** the [`api::Provider`] trait, [`OllamaClient`], and
//!   [`api::retry`] for backoff on transient failures.
//! - **Run everything end to end:** [`pipeline::enhance`].
//! - **Persist results:** [`output::save_markdown`].
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`compose`] | Field extraction, normalization, tone formatting, unified composition |
//! | [`frameworks`] | Keyword selector and framework definitions |
//! | [`rewrite`] | Per-framework rewrite loop |
//! | [`api`] | Provider trait, provider selection, retry |
//! | [`config`] | Environment-driven configuration |
//! | [`output`] | Markdown rendering and saving |
//! | [`pipeline`] | End-to-end enhancement |

pub mod api;
pub mod compose;
pub mod config;
pub mod frameworks;
pub mod output;
pub mod pipeline;
pub mod prelude;
pub mod rewrite;

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

// ── Constants ──────────────────────────────────────────────────────

/// Default Ollama generate endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";

/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "gpt-oss:20b";

/// Per-request timeout for model calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ── Request / response types ───────────────────────────────────────

/// Ollama `/api/generate` request body (non-streaming).
#[derive(Serialize, Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

/// Raw API response (internal deserialization target).
#[derive(Deserialize, Debug)]
struct RawGenerateResponse {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaClient {
    /// Create a client for `url` (the full `/api/generate` endpoint) and `model`.
    pub fn new(url: impl Into<String>, model: impl Into<String>) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("promptsmith/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            url: url.into(),
            model: model.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single non-streaming generate request and return the trimmed
    /// response text.
    pub async fn complete(&self, prompt: &str) -> Result<String, String> {
        let body = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };
        debug!(
            "Ollama request: model={}, prompt={} chars",
            body.model,
            body.prompt.len()
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(&body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| format!("failed to read response: {e}"))?;

        debug!(
            "Ollama response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(format!("Ollama API HTTP {status}: {text}"));
        }

        let parsed: RawGenerateResponse =
            serde_json::from_str(&text).map_err(|e| format!("failed to parse response: {e}"))?;

        if let Some(err) = parsed.error {
            return Err(format!("Ollama API error: {err}"));
        }

        debug!(
            "Token usage: prompt={}, completion={}",
            parsed.prompt_eval_count.unwrap_or(0),
            parsed.eval_count.unwrap_or(0),
        );

        Ok(parsed.response.unwrap_or_default().trim().to_string())
    }
}
