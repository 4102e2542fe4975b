//! Fixed-count retry for generation-model calls.
//!
//! The retry contract is narrow: only HTTP 429/500/502/503 are retried, a
//! fixed number of times (default: one retry). Timeouts are terminal per
//! attempt and are never retried. Between attempts the delay grows
//! exponentially up to a cap.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{ModelError, Result};
use crate::model::{GenerateRequest, GenerationModel};

/// Status codes that warrant another attempt.
const RETRYABLE_STATUS: [u16; 4] = [429, 500, 502, 503];

/// Whether an error is eligible for retry.
///
/// Only rate-limit and transient-server statuses qualify. A timeout already
/// consumed the full wall-clock budget, so it is terminal.
pub fn is_retryable(err: &ModelError) -> bool {
    match err {
        ModelError::Status { code, .. } => RETRYABLE_STATUS.contains(code),
        _ => false,
    }
}

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Number of retries after the first attempt (default: 1).
    pub max_retries: u32,
    /// Base delay before the first retry.
    pub base_delay: Duration,
    /// Cap on the per-retry delay.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

/// Delay before retry attempt `n` (0-indexed): `min(base * 2^n, max)`.
pub fn compute_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base_ms = config.base_delay.as_millis() as u64;
    let raw_ms = base_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(raw_ms.min(config.max_delay.as_millis() as u64))
}

/// A model wrapper that retries the retryable status codes.
pub struct RetryPolicy<M> {
    inner: M,
    config: RetryConfig,
}

impl<M: GenerationModel> RetryPolicy<M> {
    pub fn new(inner: M, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.config
    }
}

#[async_trait]
impl<M: GenerationModel> GenerationModel for RetryPolicy<M> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.inner.generate(request).await {
                Ok(text) => {
                    if attempt > 0 {
                        debug!(model = %request.model, attempt, "generation succeeded after retry");
                    }
                    return Ok(text);
                }
                Err(err) => {
                    if !is_retryable(&err) || attempt >= self.config.max_retries {
                        return Err(err);
                    }
                    let delay = compute_delay(&self.config, attempt);
                    warn!(
                        model = %request.model,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying after transient model error"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails `failures` times with the given error, then succeeds.
    struct MockModel {
        failures: AtomicU32,
        error: fn() -> ModelError,
    }

    impl MockModel {
        fn new(failures: u32, error: fn() -> ModelError) -> Self {
            Self {
                failures: AtomicU32::new(failures),
                error,
            }
        }
    }

    #[async_trait]
    impl GenerationModel for MockModel {
        fn name(&self) -> &str {
            "mock"
        }

        async fn generate(&self, _request: &GenerateRequest) -> Result<String> {
            if self.failures.load(Ordering::SeqCst) > 0 {
                self.failures.fetch_sub(1, Ordering::SeqCst);
                return Err((self.error)());
            }
            Ok("ok".into())
        }
    }

    fn request() -> GenerateRequest {
        GenerateRequest::new("m", "s", "u", 100)
    }

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    #[test]
    fn retryable_statuses() {
        for code in [429, 500, 502, 503] {
            assert!(is_retryable(&ModelError::Status {
                code,
                body: String::new()
            }));
        }
    }

    #[test]
    fn non_retryable_statuses() {
        for code in [400, 401, 403, 404, 529] {
            assert!(!is_retryable(&ModelError::Status {
                code,
                body: String::new()
            }));
        }
    }

    #[test]
    fn timeout_is_terminal() {
        assert!(!is_retryable(&ModelError::Timeout));
    }

    #[test]
    fn not_configured_is_terminal() {
        assert!(!is_retryable(&ModelError::NotConfigured("x".into())));
    }

    #[test]
    fn delay_doubles_and_caps() {
        let config = RetryConfig {
            max_retries: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(300),
        };
        assert_eq!(compute_delay(&config, 0).as_millis(), 100);
        assert_eq!(compute_delay(&config, 1).as_millis(), 200);
        assert_eq!(compute_delay(&config, 2).as_millis(), 300);
        assert_eq!(compute_delay(&config, 3).as_millis(), 300);
    }

    #[tokio::test]
    async fn retries_transient_status_once_and_succeeds() {
        let model = RetryPolicy::new(
            MockModel::new(1, || ModelError::Status {
                code: 503,
                body: "overloaded".into(),
            }),
            fast_config(1),
        );
        assert_eq!(model.generate(&request()).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn exhausted_retries_return_last_error() {
        let model = RetryPolicy::new(
            MockModel::new(10, || ModelError::Status {
                code: 429,
                body: String::new(),
            }),
            fast_config(2),
        );
        let err = model.generate(&request()).await.unwrap_err();
        assert!(matches!(err, ModelError::Status { code: 429, .. }));
    }

    #[tokio::test]
    async fn timeout_not_retried() {
        let model = RetryPolicy::new(MockModel::new(5, || ModelError::Timeout), fast_config(3));
        let err = model.generate(&request()).await.unwrap_err();
        assert!(matches!(err, ModelError::Timeout));
        // Only the first attempt ran: 5 scripted failures, 4 remain.
        assert_eq!(model.inner.failures.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn retry_count_is_exact() {
        let model = RetryPolicy::new(
            MockModel::new(10, || ModelError::Status {
                code: 500,
                body: String::new(),
            }),
            fast_config(1),
        );
        let _ = model.generate(&request()).await;
        // One initial attempt + one retry = two failures consumed.
        assert_eq!(model.inner.failures.load(Ordering::SeqCst), 8);
    }
}
