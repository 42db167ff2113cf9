//! Automatic retry with exponential backoff and jitter.
//!
//! Provider errors are classified by the HTTP status embedded in the error
//! string, falling back to connection-level wording. Rate limits, 5xx and
//! dropped connections are retried; 400/401/403/404 and unknown providers
//! are not.

use std::time::Duration;

use tracing::warn;

use super::provider::Provider;

/// Delay multipliers cycled by attempt number to spread retries out.
const JITTER_FACTORS: [f64; 4] = [0.75, 0.90, 0.60, 0.85];

/// HTTP statuses worth another attempt: rate limits and server-side trouble,
/// including Ollama answering 503 while a model is still loading.
const TRANSIENT_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// HTTP statuses that fail the same way every time. For Ollama a 404 means
/// the model has not been pulled.
const PERMANENT_STATUSES: [u16; 4] = [400, 401, 403, 404];

/// Backoff policy for model calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Attempts after the first one. `0` disables retrying.
    pub max_retries: u32,
    /// Wait before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for any single wait.
    pub max_delay: Duration,
    /// Growth factor applied per attempt.
    pub multiplier: f64,
    /// Scale waits by [`JITTER_FACTORS`].
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Default timing with `retries` extra attempts.
    pub fn with_retries(retries: u32) -> Self {
        Self {
            max_retries: retries,
            ..Default::default()
        }
    }

    /// Wait before retry number `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let growth = self.multiplier.powi(i32::try_from(attempt).unwrap_or(i32::MAX));
        let delay = (self.initial_delay.as_secs_f64() * growth).min(self.max_delay.as_secs_f64());
        let factor = if self.jitter {
            JITTER_FACTORS[attempt as usize % JITTER_FACTORS.len()]
        } else {
            1.0
        };
        Duration::from_secs_f64(delay * factor)
    }
}

/// Status code from an `... HTTP 503 ...` error string, if any.
fn http_status(error: &str) -> Option<u16> {
    let (_, rest) = error.split_once("HTTP ")?;
    rest.chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .ok()
}

/// Whether a provider error may succeed on a later attempt.
pub fn is_transient_error(error: &str) -> bool {
    if let Some(status) = http_status(error) {
        return TRANSIENT_STATUSES.contains(&status);
    }
    let lower = error.to_lowercase();
    lower.starts_with("request failed")
        || ["connection", "timed out", "timeout", "broken pipe"]
            .iter()
            .any(|needle| lower.contains(needle))
}

/// Whether a provider error will fail again no matter how often it is
/// retried.
pub fn is_permanent_error(error: &str) -> bool {
    if http_status(error).is_some_and(|status| PERMANENT_STATUSES.contains(&status)) {
        return true;
    }
    let lower = error.to_lowercase();
    lower.contains("not found") || lower.contains("unsupported model provider")
}

/// Call `provider.generate(prompt)`, retrying transient failures.
pub async fn generate_with_retry(
    config: &RetryConfig,
    provider: &dyn Provider,
    prompt: &str,
) -> Result<String, String> {
    let mut attempt = 0;
    loop {
        match provider.generate(prompt).await {
            Ok(text) => return Ok(text),
            Err(e) => {
                if attempt < config.max_retries
                    && is_transient_error(&e)
                    && !is_permanent_error(&e)
                {
                    let delay = config.delay_for_attempt(attempt);
                    warn!(
                        "Transient {} error (attempt {}/{}): {e}. Retrying in {delay:?}...",
                        provider.name(),
                        attempt + 1,
                        config.max_retries,
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                } else {
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::provider::FnProvider;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(retries: u32) -> RetryConfig {
        RetryConfig {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            ..RetryConfig::with_retries(retries)
        }
    }

    /// Fails with `error` for the first `failures` calls, then succeeds.
    fn flaky(failures: u32, error: &'static str) -> (FnProvider, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let provider = FnProvider::new("flaky", move |_prompt| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < failures {
                    Err(error.to_string())
                } else {
                    Ok("done".to_string())
                }
            }
        });
        (provider, calls)
    }

    #[test]
    fn default_config_no_retries() {
        assert_eq!(RetryConfig::default().max_retries, 0);
    }

    #[test]
    fn delay_increases_exponentially() {
        let config = RetryConfig {
            jitter: false,
            ..RetryConfig::with_retries(5)
        };
        let d0 = config.delay_for_attempt(0);
        let d1 = config.delay_for_attempt(1);
        let d2 = config.delay_for_attempt(2);
        assert!(d1 > d0, "d1={d1:?} should be > d0={d0:?}");
        assert!(d2 > d1, "d2={d2:?} should be > d1={d1:?}");
    }

    #[test]
    fn delay_capped_at_max() {
        let config = RetryConfig {
            jitter: false,
            max_delay: Duration::from_secs(2),
            ..RetryConfig::with_retries(10)
        };
        assert!(config.delay_for_attempt(10) <= Duration::from_secs(2));
    }

    #[test]
    fn jitter_reduces_delay() {
        let jittered = RetryConfig::with_retries(3);
        let plain = RetryConfig {
            jitter: false,
            ..RetryConfig::with_retries(3)
        };
        assert!(jittered.delay_for_attempt(2) <= plain.delay_for_attempt(2));
    }

    #[test]
    fn reads_status_from_error() {
        assert_eq!(http_status("Ollama API HTTP 503 Service Unavailable: busy"), Some(503));
        assert_eq!(http_status("Ollama API HTTP 404: gone"), Some(404));
        assert_eq!(http_status("request failed: dns error"), None);
    }

    #[test]
    fn jitter_cycles_factors() {
        let config = RetryConfig {
            multiplier: 1.0,
            initial_delay: Duration::from_secs(1),
            ..RetryConfig::with_retries(8)
        };
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(750));
        assert_eq!(config.delay_for_attempt(4), config.delay_for_attempt(0));
        assert!(config.delay_for_attempt(2) < config.delay_for_attempt(1));
    }

    #[test]
    fn classifies_errors() {
        assert!(is_transient_error("Ollama API HTTP 503: loading"));
        assert!(is_transient_error("request failed: connection refused"));
        assert!(!is_transient_error("Ollama API HTTP 404: model 'x' not found"));
        assert!(is_permanent_error("Ollama API HTTP 404: model 'x' not found"));
        assert!(is_permanent_error("unsupported model provider: foo"));
        assert!(!is_permanent_error("Ollama API HTTP 502: bad gateway"));
    }

    #[tokio::test]
    async fn retries_transient_until_success() {
        let (provider, calls) = flaky(2, "Ollama API HTTP 503: busy");
        let out = generate_with_retry(&fast(3), &provider, "hi").await;
        assert_eq!(out.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let (provider, calls) = flaky(10, "request failed: timed out");
        let err = generate_with_retry(&fast(2), &provider, "hi").await.unwrap_err();
        assert!(err.contains("timed out"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_error_is_not_retried() {
        let (provider, calls) = flaky(10, "Ollama API HTTP 404: model not found");
        assert!(generate_with_retry(&fast(5), &provider, "hi").await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
