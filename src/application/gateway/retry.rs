//! Exponential backoff driver for remote calls.
//!
//! Every failed attempt is reported to the circuit breaker; a success is
//! reported exactly once. All loop state is local to one `execute` call,
//! so independent calls never share a failure tally here.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AIError, CircuitBreaker};

/// How many times to retry and how long to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles each retry after that.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before attempt `attempt` (0-based); zero for the first.
    ///
    /// Attempt `i >= 1` waits `base_delay * 2^(i-1)`.
    pub fn delay_before_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Drives an operation through retries, reporting to a circuit breaker.
#[derive(Clone)]
pub struct BackoffRetrier {
    policy: RetryPolicy,
    circuit_breaker: Arc<dyn CircuitBreaker>,
}

impl BackoffRetrier {
    pub fn new(policy: RetryPolicy, circuit_breaker: Arc<dyn CircuitBreaker>) -> Self {
        Self {
            policy,
            circuit_breaker,
        }
    }

    /// Runs `operation` until it succeeds, fails non-retryably, exhausts
    /// the policy, or the breaker opens.
    ///
    /// Returns the last error on failure. Dropping the returned future
    /// abandons any pending backoff; breaker updates happen synchronously
    /// between awaits, so nothing is left half-recorded.
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> Result<T, AIError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, AIError>>,
    {
        let mut attempt = 0;

        loop {
            let delay = self.policy.delay_before_attempt(attempt);
            if !delay.is_zero() {
                sleep(delay).await;
            }

            let err = match operation(attempt).await {
                Ok(value) => {
                    self.circuit_breaker.record_success();
                    return Ok(value);
                }
                Err(err) => err,
            };

            self.circuit_breaker.record_failure();

            if !err.is_retryable() {
                tracing::warn!(attempt, error = %err, "remote call failed, not retryable");
                return Err(err);
            }
            if attempt >= self.policy.max_retries {
                tracing::warn!(attempts = attempt + 1, error = %err, "remote call retries exhausted");
                return Err(err);
            }
            if self.circuit_breaker.is_open() {
                tracing::warn!(attempt, error = %err, "circuit breaker opened during retries, giving up");
                return Err(err);
            }

            attempt += 1;
            tracing::debug!(
                attempt,
                delay_ms = u64::try_from(self.policy.delay_before_attempt(attempt).as_millis())
                    .unwrap_or(u64::MAX),
                error = %err,
                "retrying remote call"
            );
        }
    }
}
