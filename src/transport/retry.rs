//! Retry configuration and the retrying transport decorator.
//!
//! The fetch protocol never retries by itself. Callers that want retries
//! wrap their transport in [`RetryingTransport`], which retries transient
//! network errors with exponential backoff.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::Transport;
use crate::Result;
use crate::telemetry;

/// Configuration for retry behaviour on transient errors.
///
/// ```rust
/// # use huginn::transport::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(4)
///     .initial_delay(Duration::from_millis(200));
/// assert_eq!(config.delay_for_attempt(1), Duration::from_millis(400));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 1.
    pub max_attempts: u32,
    /// Base delay before the first retry. Default: 500ms.
    #[serde(with = "millis")]
    pub initial_delay: Duration,
    /// Maximum delay between retries. Default: 30s.
    #[serde(with = "millis")]
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Create a config with default values (retries disabled).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum attempts (including the initial request).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the base delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Whether more than one attempt is configured.
    pub fn is_enabled(&self) -> bool {
        self.max_attempts > 1
    }

    /// Exponential backoff: `initial_delay * 2^attempt`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.max_delay)
    }

    /// Backoff for `attempt`, unless the server sent a `retry_after` hint.
    /// Either way the delay never exceeds `max_delay`.
    pub fn effective_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after
            .map(|hint| hint.min(self.max_delay))
            .unwrap_or_else(|| self.delay_for_attempt(attempt))
    }
}

mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Decorator that retries transient failures of the wrapped [`Transport`].
///
/// Permanent errors (4xx other than 429) are returned immediately.
pub struct RetryingTransport {
    inner: Arc<dyn Transport>,
    config: RetryConfig,
}

impl RetryingTransport {
    /// Wrap a transport with retry logic.
    pub fn new(inner: Arc<dyn Transport>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl Transport for RetryingTransport {
    async fn request(&self, url: &str, headers: &[String]) -> Result<String> {
        let attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            match self.inner.request(url, headers).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt + 1 < attempts => {
                    metrics::counter!(telemetry::RETRIES_TOTAL).increment(1);
                    let delay = self.config.effective_delay(attempt, e.retry_after());
                    warn!(
                        url,
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_disables_retry() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 1);
        assert!(!config.is_enabled());
    }

    #[test]
    fn backoff_is_capped() {
        let config = RetryConfig::new()
            .initial_delay(Duration::from_secs(1))
            .max_delay(Duration::from_secs(5));
        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(5));
    }

    #[test]
    fn retry_after_hint_wins() {
        let config = RetryConfig::default();
        assert_eq!(
            config.effective_delay(0, Some(Duration::from_secs(9))),
            Duration::from_secs(9)
        );
    }
}
