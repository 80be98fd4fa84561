//! Throttle, circuit breaker, retry and cache configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound for the breaker timeout and cache expiry (one week).
const MAX_MINUTES: u64 = 7 * 24 * 60;

/// Resilience configuration for the gateway's remote calls
#[derive(Debug, Clone, Deserialize)]
pub struct ResilienceConfig {
    /// Key shared by the throttle and breaker; one per logical endpoint
    #[serde(default = "default_endpoint_key")]
    pub endpoint_key: String,

    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry; doubles for each further retry
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Minimum spacing between outbound calls
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// Consecutive failures that open the circuit breaker
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,

    /// How long the breaker stays open
    #[serde(default = "default_circuit_breaker_timeout_minutes")]
    pub circuit_breaker_timeout_minutes: u64,

    /// Analysis cache time-to-live
    #[serde(default = "default_cache_expiry_minutes")]
    pub cache_expiry_minutes: u64,

    /// Maximum cached analyses
    #[serde(default = "default_max_cache_size")]
    pub max_cache_size: usize,
}

impl ResilienceConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn circuit_breaker_timeout(&self) -> Duration {
        Duration::from_secs(self.circuit_breaker_timeout_minutes.saturating_mul(60))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_expiry_minutes.saturating_mul(60))
    }

    /// Validate resilience configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.endpoint_key.trim().is_empty() {
            return Err(ValidationError::MissingRequired("RESILIENCE__ENDPOINT_KEY"));
        }
        if self.max_consecutive_failures == 0 {
            return Err(ValidationError::InvalidFailureThreshold);
        }
        if self.circuit_breaker_timeout_minutes == 0 {
            return Err(ValidationError::InvalidBreakerTimeout);
        }
        if self.max_cache_size == 0 || self.cache_expiry_minutes == 0 {
            return Err(ValidationError::InvalidCacheBounds);
        }
        if self.circuit_breaker_timeout_minutes > MAX_MINUTES || self.cache_expiry_minutes > MAX_MINUTES {
            return Err(ValidationError::DurationTooLong(MAX_MINUTES));
        }
        if self.max_retries > 10 {
            return Err(ValidationError::TooManyRetries);
        }
        Ok(())
    }
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            endpoint_key: default_endpoint_key(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            min_interval_ms: default_min_interval_ms(),
            max_consecutive_failures: default_max_consecutive_failures(),
            circuit_breaker_timeout_minutes: default_circuit_breaker_timeout_minutes(),
            cache_expiry_minutes: default_cache_expiry_minutes(),
            max_cache_size: default_max_cache_size(),
        }
    }
}

fn default_endpoint_key() -> String {
    "gemini".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_min_interval_ms() -> u64 {
    2000
}

fn default_max_consecutive_failures() -> u32 {
    5
}

fn default_circuit_breaker_timeout_minutes() -> u64 {
    5
}

fn default_cache_expiry_minutes() -> u64 {
    30
}

fn default_max_cache_size() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resilience_defaults() {
        let config = ResilienceConfig::default();
        assert_eq!(config.endpoint_key, "gemini");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.base_delay(), Duration::from_millis(1000));
        assert_eq!(config.min_interval(), Duration::from_millis(2000));
        assert_eq!(config.max_consecutive_failures, 5);
        assert_eq!(config.circuit_breaker_timeout(), Duration::from_secs(300));
        assert_eq!(config.cache_ttl(), Duration::from_secs(1800));
        assert_eq!(config.max_cache_size, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: ResilienceConfig =
            serde_json::from_str(r#"{"max_retries": 1, "endpoint_key": "reports"}"#).unwrap();
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.endpoint_key, "reports");
        assert_eq!(config.max_cache_size, 100);
    }

    #[test]
    fn test_validation_rejects_degenerate_bounds() {
        let zero_threshold = ResilienceConfig {
            max_consecutive_failures: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_threshold.validate(),
            Err(ValidationError::InvalidFailureThreshold)
        ));

        let empty_cache = ResilienceConfig {
            max_cache_size: 0,
            ..Default::default()
        };
        assert!(matches!(empty_cache.validate(), Err(ValidationError::InvalidCacheBounds)));

        let blank_key = ResilienceConfig {
            endpoint_key: "".to_string(),
            ..Default::default()
        };
        assert!(blank_key.validate().is_err());
    }

    #[test]
    fn test_huge_minute_values_are_rejected_without_overflow() {
        let config = ResilienceConfig {
            circuit_breaker_timeout_minutes: u64::MAX / 2,
            cache_expiry_minutes: u64::MAX,
            ..Default::default()
        };

        assert!(matches!(config.validate(), Err(ValidationError::DurationTooLong(_))));
        assert_eq!(config.circuit_breaker_timeout(), Duration::from_secs(u64::MAX));
        assert_eq!(config.cache_ttl(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_one_week_is_the_longest_accepted_duration() {
        let config = ResilienceConfig {
            circuit_breaker_timeout_minutes: MAX_MINUTES,
            cache_expiry_minutes: MAX_MINUTES,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let too_long = ResilienceConfig {
            cache_expiry_minutes: MAX_MINUTES + 1,
            ..Default::default()
        };
        assert!(too_long.validate().is_err());
    }
}
