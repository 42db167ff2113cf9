//! Model provider abstraction.
//!
//! A [`Provider`] turns an instruction prompt into generated text. The
//! rewriter only depends on this trait, so backends are interchangeable:
//!
//! - [`OllamaClient`](crate::OllamaClient) — local Ollama `/api/generate`.
//! - [`FnProvider`] — closure-backed, for tests and embedding.
//!
//! [`build_provider`] picks the backend named in an
//! [`EnhancerConfig`](crate::config::EnhancerConfig).

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::OllamaClient;
use crate::config::EnhancerConfig;

/// Boxed future returned by [`Provider::generate`].
pub type GenerateFuture<'a> = Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>;

/// A text-generation backend.
pub trait Provider: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    /// Generate a response for `prompt`.
    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a>;
}

impl Provider for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a> {
        Box::pin(self.complete(prompt))
    }
}

// ── FnProvider ─────────────────────────────────────────────────────

/// Type-erased async handler for [`FnProvider`].
type ErasedGenerator = Box<
    dyn Fn(String) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send>> + Send + Sync,
>;

/// A provider backed by an async closure.
///
/// ```
/// use promptsmith::api::{FnProvider, Provider};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let echo = FnProvider::new("echo", |prompt: String| async move { Ok(prompt.to_uppercase()) });
/// assert_eq!(echo.generate("hi").await.unwrap(), "HI");
/// # }
/// ```
pub struct FnProvider {
    name: String,
    handler: ErasedGenerator,
}

impl FnProvider {
    pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, String>> + Send + 'static,
    {
        let erased = move |prompt: String| -> Pin<
            Box<dyn Future<Output = Result<String, String>> + Send>,
        > { Box::pin(handler(prompt)) };
        Self {
            name: name.into(),
            handler: Box::new(erased),
        }
    }
}

impl Provider for FnProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a> {
        (self.handler)(prompt.to_string())
    }
}

impl fmt::Debug for FnProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProvider").field("name", &self.name).finish()
    }
}

// ── Selection ──────────────────────────────────────────────────────

/// Supported provider backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Ollama,
}

impl ProviderKind {
    /// Parse a backend name (case-insensitive).
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            _ => Err(format!("unsupported model provider: {value}")),
        }
    }
}

/// Build the provider named in `config`.
pub fn build_provider(config: &EnhancerConfig) -> Result<Box<dyn Provider>, String> {
    match ProviderKind::parse(&config.provider)? {
        ProviderKind::Ollama => {
            let client = OllamaClient::new(&config.ollama_url, &config.ollama_model)?;
            Ok(Box::new(client))
        }
    }
}
