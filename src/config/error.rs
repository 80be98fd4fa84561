//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("AI base URL must use http or https")]
    InvalidBaseUrl,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Temperature must be between 0.0 and 2.0")]
    InvalidTemperature,

    #[error("Circuit breaker failure threshold must be at least 1")]
    InvalidFailureThreshold,

    #[error("Circuit breaker timeout must be at least 1 minute")]
    InvalidBreakerTimeout,

    #[error("Cache size and expiry must both be positive")]
    InvalidCacheBounds,

    #[error("Breaker timeout and cache expiry must not exceed {0} minutes")]
    DurationTooLong(u64),

    #[error("Retry count exceeds maximum allowed (10)")]
    TooManyRetries,
}
