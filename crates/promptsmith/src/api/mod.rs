//! Model access layer: the provider abstraction and retry policy.
//!
//! - [`provider`] — [`Provider`] trait, [`FnProvider`] for closures, and
//!   [`build_provider`] to construct the configured backend.
//! - [`retry`] — transient error detection (429, 5xx, refused connections,
//!   timeouts) with exponential backoff. Never retries 400/404 errors.
//!
//! The Ollama HTTP client itself lives at the crate root as
//! [`OllamaClient`](crate::OllamaClient).

pub mod provider;
pub mod retry;

pub use provider::{FnProvider, GenerateFuture, Provider, ProviderKind, build_provider};
pub use retry::{RetryConfig, generate_with_retry};
