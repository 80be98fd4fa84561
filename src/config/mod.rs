//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `HELPDESK_AI` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use helpdesk_ai_gateway::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Gateway model: {}", config.ai.model);
//! ```

mod ai;
mod error;
mod resilience;
mod telemetry;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use resilience::ResilienceConfig;
pub use telemetry::{LogFormat, TelemetryConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a gateway
/// that runs entirely on its keyword fallback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Text-generation provider (key, model, endpoint)
    #[serde(default)]
    pub ai: AiConfig,

    /// Throttle, breaker, retry and cache tuning
    #[serde(default)]
    pub resilience: ResilienceConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `HELPDESK_AI` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `HELPDESK_AI__AI__API_KEY=...` -> `ai.api_key = ...`
    /// - `HELPDESK_AI__RESILIENCE__MAX_RETRIES=5` -> `resilience.max_retries = 5`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HELPDESK_AI")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.resilience.validate()?;
        Ok(())
    }
}
