//! Gemini Provider - Implementation of AIProvider for Google's Gemini API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(Some(api_key))
//!     .with_model("gemini-1.5-flash")
//!     .with_streaming(true);
//!
//! let provider = GeminiProvider::new(config)?;
//! ```
//!
//! # Retries
//!
//! This adapter makes exactly one HTTP call per `complete`. Retry, backoff
//! and circuit breaking are driven by the gateway so that every attempt is
//! visible to the shared breaker.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

use super::gemini_wire::{extract_text, GenerateContentRequest, GenerationConfig};
use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// Error bodies are truncated to this many characters in `AIError::Status`.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Values shipped in sample configuration files that are not real keys.
const PLACEHOLDER_KEYS: &[&str] = &["your_api_key", "your-api-key", "your_api_key_here", "changeme", "xxx"];

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Option<Secret<String>>,
    /// Model to use (e.g., "gemini-1.5-flash").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Use the streaming endpoint (responses arrive as a chunk array).
    pub streaming: bool,
    /// Sampling temperature applied when the request leaves it unset.
    pub temperature: Option<f32>,
    /// Output token cap applied when the request leaves it unset.
    pub max_output_tokens: Option<u32>,
}

impl GeminiConfig {
    /// Creates a new configuration. `None`, blank and placeholder keys all
    /// leave the provider unconfigured.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.map(Secret::new),
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout: Duration::from_secs(60),
            streaming: false,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Selects the streaming endpoint.
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Sets default generation parameters.
    pub fn with_generation_defaults(mut self, temperature: Option<f32>, max_output_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Whether a usable (non-blank, non-placeholder) key is present.
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .map(|key| is_real_key(key.expose_secret()))
            .unwrap_or(false)
    }

    fn api_key(&self) -> &str {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .unwrap_or_default()
    }
}

/// Shared with configuration so both agree on what counts as a key.
pub(crate) fn is_real_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && !PLACEHOLDER_KEYS.contains(&key.to_lowercase().as_str())
}

/// Gemini API provider implementation.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the generation endpoint URL.
    fn endpoint_url(&self) -> String {
        let method = if self.config.streaming {
            "streamGenerateContent"
        } else {
            "generateContent"
        };
        format!(
            "{}/models/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    fn to_gemini_request(&self, request: &CompletionRequest) -> GenerateContentRequest {
        let temperature = request.temperature.or(self.config.temperature);
        let max_output_tokens = request.max_output_tokens.or(self.config.max_output_tokens);

        let generation_config = (temperature.is_some() || max_output_tokens.is_some()).then_some(GenerationConfig {
            temperature,
            max_output_tokens,
        });

        GenerateContentRequest::new(request.prompt.clone(), generation_config)
    }

    /// Only transport failures come back retryable; a request that could
    /// not be built or that loops on redirects is rejected outright.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        self.client
            .post(self.endpoint_url())
            .header("x-goog-api-key", self.config.api_key())
            .header("x-request-id", &request.trace_id)
            .json(&self.to_gemini_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else if e.is_builder() || e.is_redirect() {
                    AIError::InvalidRequest(e.to_string())
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Maps non-success statuses to errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body: String = response
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect();

        match status.as_u16() {
            429 => Err(AIError::RateLimited),
            code => Err(AIError::status(code, error_body)),
        }
    }
}

#[async_trait]
impl AIProvider for GeminiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self.send_request(&request).await?;
        let response = self.handle_response_status(response).await?;

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                AIError::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                }
            } else {
                AIError::network(format!("Failed to read response body: {}", e))
            }
        })?;

        let content = extract_text(&body);
        if content.is_empty() {
            tracing::warn!(trace_id = %request.trace_id, "provider response carried no text");
        }

        Ok(CompletionResponse::new(content, self.config.model.clone()))
    }

    fn is_configured(&self) -> bool {
        self.config.has_api_key()
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", self.config.model.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_and_blank_keys_are_not_configured() {
        assert!(!GeminiConfig::new(None).has_api_key());
        assert!(!GeminiConfig::new(Some("   ".into())).has_api_key());
        assert!(!GeminiConfig::new(Some("YOUR_API_KEY".into())).has_api_key());
        assert!(GeminiConfig::new(Some("AIzaSy-real".into())).has_api_key());
    }

    #[test]
    fn endpoint_url_follows_streaming_flag() {
        let provider = GeminiProvider::new(
            GeminiConfig::new(Some("k".into()))
                .with_base_url("http://localhost:9999/v1beta/")
                .with_model("gemini-test"),
        )
        .unwrap();
        assert_eq!(
            provider.endpoint_url(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );

        let streaming = GeminiProvider::new(
            GeminiConfig::new(Some("k".into()))
                .with_base_url("http://localhost:9999/v1beta")
                .with_model("gemini-test")
                .with_streaming(true),
        )
        .unwrap();
        assert!(streaming.endpoint_url().ends_with(":streamGenerateContent"));
    }

    #[test]
    fn request_parameters_override_config_defaults() {
        let provider = GeminiProvider::new(
            GeminiConfig::new(Some("k".into())).with_generation_defaults(Some(0.1), Some(100)),
        )
        .unwrap();

        let json = serde_json::to_value(
            provider.to_gemini_request(&CompletionRequest::new("p").with_max_output_tokens(5)),
        )
        .unwrap();
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 5);

        let bare = GeminiProvider::new(GeminiConfig::new(Some("k".into()))).unwrap();
        let json = serde_json::to_value(bare.to_gemini_request(&CompletionRequest::new("p"))).unwrap();
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn provider_info_reports_model() {
        let provider = GeminiProvider::new(GeminiConfig::new(None).with_model("gemini-x")).unwrap();
        assert_eq!(provider.provider_info(), ProviderInfo::new("gemini", "gemini-x"));
        assert!(!provider.is_configured());
    }
}
