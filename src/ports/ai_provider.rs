//! AI Provider Port - Interface for the remote text-generation service.
//!
//! The gateway never talks HTTP directly; it drives an `AIProvider` and
//! treats whatever comes back as plain text. Wire formats (single object vs
//! streamed chunk array) are the adapter's problem.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoProvider;
//!
//! #[async_trait]
//! impl AIProvider for EchoProvider {
//!     async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
//!         Ok(CompletionResponse::new(request.prompt, "echo"))
//!     }
//!
//!     fn is_configured(&self) -> bool {
//!         true
//!     }
//!
//!     fn provider_info(&self) -> ProviderInfo {
//!         ProviderInfo::new("echo", "echo")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for text-generation provider interactions.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a completion for a single prompt.
    ///
    /// A transport-level success whose body could not be understood yields
    /// an empty `content`, not an error.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Whether credentials are present. Unconfigured providers are never
    /// called.
    fn is_configured(&self) -> bool;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for a completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Full prompt text.
    pub prompt: String,
    /// Temperature for response randomness; provider default when `None`.
    pub temperature: Option<f32>,
    /// Maximum tokens to generate; provider default when `None`.
    pub max_output_tokens: Option<u32>,
    /// Correlation id for tracing.
    pub trace_id: String,
}

impl CompletionRequest {
    /// Creates a new completion request with a fresh trace id.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
            max_output_tokens: None,
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }
}

/// Response from a completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Generated text, possibly empty.
    pub content: String,
    /// Model that generated the response.
    pub model: String,
}

impl CompletionResponse {
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
        }
    }
}

/// Provider information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "gemini", "mock").
    pub name: String,
    /// Model identifier.
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// AI provider errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AIError {
    /// HTTP 429 from the provider.
    #[error("rate limited by provider")]
    RateLimited,

    /// Any other non-success HTTP status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// Connection-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The call exceeded its wall-clock budget.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// The request could not be built or sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl AIError {
    /// Creates a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Returns true if this error is retryable.
    ///
    /// Only rate limiting and transport failures are; every other status
    /// ends the retry loop at once.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited | AIError::Network(_) | AIError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_request_builder_works() {
        let request = CompletionRequest::new("Hello")
            .with_temperature(0.2)
            .with_max_output_tokens(512);

        assert_eq!(request.prompt, "Hello");
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_output_tokens, Some(512));
        assert!(!request.trace_id.is_empty());
    }

    #[test]
    fn each_request_gets_its_own_trace_id() {
        assert_ne!(
            CompletionRequest::new("a").trace_id,
            CompletionRequest::new("a").trace_id
        );
    }

    #[test]
    fn ai_error_retryable_classification() {
        assert!(AIError::RateLimited.is_retryable());
        assert!(AIError::network("connection refused").is_retryable());
        assert!(AIError::Timeout { timeout_secs: 60 }.is_retryable());

        assert!(!AIError::status(500, "boom").is_retryable());
        assert!(!AIError::status(401, "bad key").is_retryable());
        assert!(!AIError::InvalidRequest("x".into()).is_retryable());
    }

    #[test]
    fn ai_error_displays_correctly() {
        assert_eq!(AIError::RateLimited.to_string(), "rate limited by provider");
        assert_eq!(
            AIError::status(503, "down").to_string(),
            "unexpected status 503: down"
        );
        assert_eq!(
            AIError::Timeout { timeout_secs: 60 }.to_string(),
            "request timed out after 60s"
        );
    }
}
