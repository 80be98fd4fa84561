//! CircuitBreaker port - Interface for remote-service resilience.
//!
//! The circuit breaker stops the gateway from hammering a text-generation
//! service that is already failing, and keeps callers inside their own
//! latency budget while it recovers.
//!
//! ## States
//!
//! - **Closed**: Normal operation, calls flow through
//! - **Open**: Too many consecutive failures, calls go straight to fallback
//!
//! There is no externally visible half-open state. Recovery is evaluated
//! lazily whenever the state is queried.
//!
//! ## Transitions
//!
//! ```text
//! Closed --[consecutive failures reach threshold]--> Open (opened_at = now)
//! Open   --[now - opened_at > open_timeout, on query]--> Closed (failures = 0)
//! any    --[success]--> Closed (failures = 0)
//! ```

use std::time::Duration;

/// Observable circuit breaker states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls flow through to the remote service.
    Closed,

    /// Calls are short-circuited to the fallback path until the open
    /// timeout elapses.
    Open,
}

/// Configuration for circuit breaker behavior.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit.
    ///
    /// Default: 5 failures
    pub failure_threshold: u32,

    /// How long the circuit stays open before the next query closes it.
    ///
    /// Default: 5 minutes
    pub open_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            open_timeout: Duration::from_secs(5 * 60),
        }
    }
}

impl CircuitBreakerConfig {
    pub fn new(failure_threshold: u32, open_timeout: Duration) -> Self {
        Self {
            failure_threshold,
            open_timeout,
        }
    }
}

/// Port for circuit breaker functionality.
///
/// One instance guards one logical remote endpoint. Implementations must
/// make every transition atomic with respect to concurrent callers.
///
/// # Example
///
/// ```ignore
/// if circuit_breaker.is_open() {
///     return fallback::classify(&request);
/// }
///
/// match generator.generate(request).await {
///     Ok(response) => circuit_breaker.record_success(),
///     Err(_) => circuit_breaker.record_failure(),
/// }
/// ```
pub trait CircuitBreaker: Send + Sync {
    /// Get the current state of the circuit.
    ///
    /// Side-effecting: an open circuit whose timeout has elapsed is closed
    /// (and its failure count reset) by this call.
    fn state(&self) -> CircuitState;

    /// Shorthand for `state() == CircuitState::Open`.
    fn is_open(&self) -> bool {
        self.state() == CircuitState::Open
    }

    /// Record a successful call.
    ///
    /// Resets the consecutive failure count and forces the circuit closed.
    fn record_success(&self);

    /// Record a failed call.
    ///
    /// Opens the circuit when the consecutive failure count reaches the
    /// threshold.
    fn record_failure(&self);

    /// Force reset the circuit to closed state.
    ///
    /// Use sparingly - typically for administrative intervention.
    fn reset(&self);

    /// Get metrics about the circuit breaker.
    ///
    /// Read-only: never transitions the circuit.
    fn metrics(&self) -> CircuitBreakerMetrics;
}

/// Metrics about circuit breaker behavior.
#[derive(Debug, Clone, Default)]
pub struct CircuitBreakerMetrics {
    /// Current state, as last evaluated
    pub state: Option<CircuitState>,

    /// Total successful calls since creation
    pub total_successes: u64,

    /// Total failed calls since creation
    pub total_failures: u64,

    /// Times the circuit has opened
    pub times_opened: u64,

    /// Current consecutive failure count
    pub consecutive_failures: u32,

    /// How long ago the circuit opened (when open)
    pub open_for: Option<Duration>,

    /// Time until the next query closes the circuit (when open)
    pub time_until_close: Option<Duration>,
}
