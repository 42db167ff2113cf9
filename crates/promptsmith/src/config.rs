//! Enhancer configuration with environment overrides.
//!
//! [`EnhancerConfig`] carries everything a run needs: which provider to use,
//! the Ollama endpoint and model, where framework definitions come from, and
//! where results are saved. Values come from defaults, then environment
//! variables (optionally seeded from a `.env` file), then caller overrides.
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `MODEL_PROVIDER` | `provider` | `ollama` |
//! | `OLLAMA_MODEL` | `ollama_model` | `gpt-oss:20b` |
//! | `OLLAMA_URL` | `ollama_url` | `http://localhost:11434/api/generate` |
//! | `PROMPTSMITH_OUTPUT_DIR` | `output_dir` | `enhanced_prompts` |
//! | `PROMPTSMITH_FRAMEWORKS` | `frameworks_path` | bundled catalog |
//! | `PROMPTSMITH_MAX_FRAMEWORKS` | `max_frameworks` | `3` |
//! | `PROMPTSMITH_RETRIES` | `retry.max_retries` | `0` |

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::api::retry::RetryConfig;
use crate::frameworks::{FrameworkCatalog, MAX_FRAMEWORKS};
use crate::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};

/// Default directory for saved Markdown results.
pub const DEFAULT_OUTPUT_DIR: &str = "enhanced_prompts";

/// Default provider name.
pub const DEFAULT_PROVIDER: &str = "ollama";

/// Configuration for a prompt-enhancement run.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancerConfig {
    /// Provider backend name. Default: `"ollama"`.
    pub provider: String,
    /// Ollama model identifier. Default: `"gpt-oss:20b"`.
    pub ollama_model: String,
    /// Full Ollama generate endpoint URL.
    pub ollama_url: String,
    /// Directory for saved Markdown files. Default: `"enhanced_prompts"`.
    pub output_dir: PathBuf,
    /// Framework definitions file. `None` uses the bundled catalog.
    pub frameworks_path: Option<PathBuf>,
    /// Maximum frameworks applied per prompt. Default: `3`.
    pub max_frameworks: usize,
    /// Retry policy for model calls. Default: no retries.
    pub retry: RetryConfig,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            frameworks_path: None,
            max_frameworks: MAX_FRAMEWORKS,
            retry: RetryConfig::default(),
        }
    }
}

impl EnhancerConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, String> {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(provider) = get("MODEL_PROVIDER") {
            config.provider = provider;
        }
        if let Some(model) = get("OLLAMA_MODEL") {
            config.ollama_model = model;
        }
        if let Some(url) = get("OLLAMA_URL") {
            config.ollama_url = url;
        }
        if let Some(dir) = get("PROMPTSMITH_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(path) = get("PROMPTSMITH_FRAMEWORKS") {
            config.frameworks_path = Some(PathBuf::from(path));
        }
        if let Some(max) = get("PROMPTSMITH_MAX_FRAMEWORKS") {
            config.max_frameworks = max
                .trim()
                .parse()
                .map_err(|e| format!("invalid PROMPTSMITH_MAX_FRAMEWORKS '{max}': {e}"))?;
        }
        if let Some(retries) = get("PROMPTSMITH_RETRIES") {
            config.retry.max_retries = retries
                .trim()
                .parse()
                .map_err(|e| format!("invalid PROMPTSMITH_RETRIES '{retries}': {e}"))?;
        }

        debug!(
            "Config: provider={}, model={}, url={}",
            config.provider, config.ollama_model, config.ollama_url
        );
        Ok(config)
    }

    /// Load the framework catalog from `frameworks_path`, or the bundled one.
    pub fn load_catalog(&self) -> Result<FrameworkCatalog, String> {
        match &self.frameworks_path {
            Some(path) => FrameworkCatalog::load(path),
            None => FrameworkCatalog::bundled(),
        }
    }
}

/// Load variables from a `.env` file in the current directory, if any.
///
/// A missing file is fine; an unreadable or malformed one is logged and
/// otherwise ignored.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment variables from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env file: {e}"),
    }
}
