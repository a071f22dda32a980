//! Bounded Retry
//!
//! Exponential backoff shared by every outbound provider call. Only errors
//! that classify themselves as transient are retried; rate-limit hints from
//! the provider take precedence over the computed backoff.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use studylink_llm::LlmError;

use crate::services::embedding::EmbeddingError;

/// Errors that know whether repeating the call can help.
pub trait RetryableError: std::fmt::Display {
    fn is_retryable(&self) -> bool;
    fn retry_after_secs(&self) -> Option<u64>;
}

impl RetryableError for EmbeddingError {
    fn is_retryable(&self) -> bool {
        EmbeddingError::is_retryable(self)
    }

    fn retry_after_secs(&self) -> Option<u64> {
        EmbeddingError::retry_after_secs(self)
    }
}

impl RetryableError for LlmError {
    fn is_retryable(&self) -> bool {
        LlmError::is_retryable(self)
    }

    fn retry_after_secs(&self) -> Option<u64> {
        LlmError::retry_after_secs(self)
    }
}

/// Retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first call.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound for any single wait, including provider hints.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    2
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10_000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("retry.max_attempts must be at least 1".to_string());
        }
        if self.max_attempts > 10 {
            return Err("retry.max_attempts cannot exceed 10".to_string());
        }
        if self.base_delay_ms > self.max_delay_ms {
            return Err(format!(
                "retry.base_delay_ms ({}) exceeds retry.max_delay_ms ({})",
                self.base_delay_ms, self.max_delay_ms
            ));
        }
        Ok(())
    }

    /// Wait before the attempt following `attempt` (0-based).
    pub fn delay_for<E: RetryableError>(&self, attempt: u32, err: &E) -> Duration {
        let wait_ms = match err.retry_after_secs() {
            Some(secs) => secs.saturating_mul(1000),
            None => self
                .base_delay_ms
                .saturating_mul(1u64.checked_shl(attempt).unwrap_or(u64::MAX)),
        };
        Duration::from_millis(wait_ms.min(self.max_delay_ms))
    }

    /// Run `call` until it succeeds, fails with a non-retryable error, or
    /// the attempt budget is spent. The last error is returned unchanged.
    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, E>
    where
        E: RetryableError,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt: u32 = 0;

        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !err.is_retryable() || attempt + 1 >= max_attempts {
                        return Err(err);
                    }

                    let wait = self.delay_for(attempt, &err);
                    tracing::warn!(
                        operation,
                        attempt = attempt + 1,
                        max_attempts,
                        wait_ms = wait.as_millis() as u64,
                        error = %err,
                        "retryable error, backing off"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
            }
        }
    }
}
