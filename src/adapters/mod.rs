//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the gateway to external systems and hold its
//! process-local state:
//! - `ai` - Text-generation providers (Gemini, mock)
//! - `resilience` - Circuit breaker and throttle
//! - `cache` - Analysis cache

pub mod ai;
pub mod cache;
pub mod resilience;

pub use ai::{GeminiConfig, GeminiProvider, MockAIProvider, MockError};
pub use cache::InMemoryAnalysisCache;
pub use resilience::{InMemoryCircuitBreaker, IntervalThrottle};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the data if a previous holder panicked.
///
/// Every critical section in these adapters leaves the state consistent
/// before it can panic, so the poisoned value is safe to reuse.
pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
