//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the gateway and the outside world. Adapters implement these ports.
//!
//! ## Remote Service
//!
//! - `AIProvider` - The remote text-generation service
//!
//! ## Resilience State
//!
//! - `CircuitBreaker` - Stops calls to a failing endpoint for a cooldown
//! - `Throttle` - Minimum spacing between outbound calls per key
//! - `AnalysisCache` - TTL-bounded memory of recent analyses
//!
//! All resilience state is process-local; separate instances of the
//! service do not share breakers, throttles or caches.

mod ai_provider;
mod analysis_cache;
mod circuit_breaker;
mod throttle;

pub use ai_provider::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};
pub use analysis_cache::AnalysisCache;
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerMetrics, CircuitState};
pub use throttle::Throttle;
