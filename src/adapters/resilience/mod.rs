//! Resilience adapters.
//!
//! In-memory implementations of the CircuitBreaker and Throttle ports,
//! suitable for single-process deployments.

mod circuit_breaker;
mod throttle;

pub use circuit_breaker::InMemoryCircuitBreaker;
pub use throttle::IntervalThrottle;
