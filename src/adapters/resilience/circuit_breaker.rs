//! In-memory circuit breaker for a single remote endpoint.

use std::sync::Mutex;
use tokio::time::Instant;

use crate::adapters::lock_unpoisoned;
use crate::ports::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerMetrics, CircuitState};

/// Circuit breaker keeping its state in process memory.
///
/// The `{open, opened_at, consecutive_failures}` triple lives behind one
/// mutex, so every transition is atomic with respect to concurrent calls.
#[derive(Debug)]
pub struct InMemoryCircuitBreaker {
    endpoint: String,
    config: CircuitBreakerConfig,
    state: Mutex<BreakerState>,
}

#[derive(Debug, Default)]
struct BreakerState {
    consecutive_failures: u32,
    /// `Some` while the circuit is open.
    opened_at: Option<Instant>,
    total_successes: u64,
    total_failures: u64,
    times_opened: u64,
}

impl BreakerState {
    fn close(&mut self) {
        self.opened_at = None;
        self.consecutive_failures = 0;
    }

    fn current(&self) -> CircuitState {
        if self.opened_at.is_some() {
            CircuitState::Open
        } else {
            CircuitState::Closed
        }
    }
}

impl InMemoryCircuitBreaker {
    /// Creates a closed breaker for `endpoint`.
    pub fn new(endpoint: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            endpoint: endpoint.into(),
            config,
            state: Mutex::new(BreakerState::default()),
        }
    }
}

impl CircuitBreaker for InMemoryCircuitBreaker {
    fn state(&self) -> CircuitState {
        let mut state = lock_unpoisoned(&self.state);

        if let Some(opened_at) = state.opened_at {
            if opened_at.elapsed() > self.config.open_timeout {
                state.close();
                tracing::info!(endpoint = %self.endpoint, "circuit breaker timeout elapsed, closing");
            }
        }

        state.current()
    }

    fn record_success(&self) {
        let mut state = lock_unpoisoned(&self.state);
        state.total_successes += 1;
        if state.opened_at.is_some() {
            tracing::info!(endpoint = %self.endpoint, "circuit breaker closed by successful call");
        }
        state.close();
    }

    fn record_failure(&self) {
        let mut state = lock_unpoisoned(&self.state);
        state.total_failures += 1;
        state.consecutive_failures = state.consecutive_failures.saturating_add(1);

        if state.opened_at.is_none() && state.consecutive_failures >= self.config.failure_threshold {
            state.opened_at = Some(Instant::now());
            state.times_opened += 1;
            tracing::warn!(
                endpoint = %self.endpoint,
                failures = state.consecutive_failures,
                open_for_secs = self.config.open_timeout.as_secs(),
                "circuit breaker opened"
            );
        }
    }

    fn reset(&self) {
        lock_unpoisoned(&self.state).close();
    }

    fn metrics(&self) -> CircuitBreakerMetrics {
        let state = lock_unpoisoned(&self.state);
        let open_for = state.opened_at.map(|opened_at| opened_at.elapsed());

        CircuitBreakerMetrics {
            state: Some(state.current()),
            total_successes: state.total_successes,
            total_failures: state.total_failures,
            times_opened: state.times_opened,
            consecutive_failures: state.consecutive_failures,
            open_for,
            time_until_close: open_for.map(|elapsed| self.config.open_timeout.saturating_sub(elapsed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn breaker(threshold: u32, timeout: Duration) -> InMemoryCircuitBreaker {
        InMemoryCircuitBreaker::new("test", CircuitBreakerConfig::new(threshold, timeout))
    }

    #[tokio::test(start_paused = true)]
    async fn opens_exactly_at_threshold() {
        let cb = breaker(5, Duration::from_secs(300));

        for _ in 0..4 {
            cb.record_failure();
        }
        assert!(!cb.is_open(), "one short of threshold must stay closed");

        cb.record_failure();
        assert!(cb.is_open());
        assert_eq!(cb.metrics().times_opened, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn success_resets_failure_count() {
        let cb = breaker(3, Duration::from_secs(300));

        cb.record_failure();
        cb.record_failure();
        cb.record_success();
        cb.record_failure();
        cb.record_failure();

        assert!(!cb.is_open());
        assert_eq!(cb.metrics().consecutive_failures, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn self_heals_after_timeout() {
        let cb = breaker(1, Duration::from_secs(300));
        cb.record_failure();
        assert!(cb.is_open());

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(cb.is_open());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!cb.is_open());
        assert_eq!(cb.metrics().consecutive_failures, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn healed_breaker_needs_full_threshold_to_reopen() {
        let cb = breaker(2, Duration::from_secs(60));
        cb.record_failure();
        cb.record_failure();
        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cb.state(), CircuitState::Closed);

        cb.record_failure();
        assert!(!cb.is_open());
        cb.record_failure();
        assert!(cb.is_open());
        assert_eq!(cb.metrics().times_opened, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn success_while_open_forces_closed() {
        let cb = breaker(1, Duration::from_secs(300));
        cb.record_failure();
        assert!(cb.is_open());

        cb.record_success();
        assert!(!cb.is_open());
        assert!(cb.metrics().open_for.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn metrics_report_time_until_close() {
        let cb = breaker(1, Duration::from_secs(100));
        cb.record_failure();
        tokio::time::advance(Duration::from_secs(40)).await;

        let metrics = cb.metrics();
        assert_eq!(metrics.state, Some(CircuitState::Open));
        assert_eq!(metrics.total_failures, 1);
        assert_eq!(metrics.time_until_close, Some(Duration::from_secs(60)));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_closes_circuit() {
        let cb = breaker(1, Duration::from_secs(300));
        cb.record_failure();
        cb.reset();
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[test]
    fn concurrent_failures_open_exactly_once() {
        let cb = std::sync::Arc::new(breaker(10, Duration::from_secs(300)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cb = cb.clone();
                std::thread::spawn(move || {
                    for _ in 0..5 {
                        cb.record_failure();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let metrics = cb.metrics();
        assert_eq!(metrics.total_failures, 40);
        assert_eq!(metrics.times_opened, 1);
    }
}
