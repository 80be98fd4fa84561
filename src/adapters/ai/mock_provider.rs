//! Mock AI Provider for testing.
//!
//! Provides a configurable mock implementation of the AIProvider port,
//! allowing tests to run without calling the real API.
//!
//! # Features
//!
//! - Pre-configured responses consumed in order
//! - Simulated delays for timeout and cancellation testing
//! - Error injection for retry and breaker testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_error(MockError::RateLimited)
//!     .with_response(r#"{"category":"Hardware","priority":"High"}"#);
//!
//! let gateway = AiGateway::new(settings, Arc::new(provider.clone()));
//! gateway.analyze(&request).await;
//! assert_eq!(provider.call_count(), 2);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::adapters::lock_unpoisoned;
use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// Text returned once the queue is exhausted.
pub const DEFAULT_MOCK_CONTENT: &str = "Mock response";

/// Mock AI provider for testing.
///
/// Clones share the response queue and call history.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Whether the provider claims to have credentials.
    configured: bool,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful completion with this text.
    Success(String),
    /// Return an error.
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate HTTP 429.
    RateLimited,
    /// Simulate another non-success status.
    Status { status: u16 },
    /// Simulate a connection failure.
    Network { message: String },
    /// Simulate a transport timeout.
    Timeout { timeout_secs: u64 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited => AIError::RateLimited,
            MockError::Status { status } => AIError::status(status, "mock error"),
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    /// Creates a new configured mock provider.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            configured: true,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        lock_unpoisoned(&self.responses).push_back(MockResponse::Success(content.into()));
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        lock_unpoisoned(&self.responses).push_back(MockResponse::Error(error));
        self
    }

    /// Adds the same error `times` times.
    pub fn with_errors(self, error: MockError, times: usize) -> Self {
        {
            let mut responses = lock_unpoisoned(&self.responses);
            for _ in 0..times {
                responses.push_back(MockResponse::Error(error.clone()));
            }
        }
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Makes the provider report missing credentials.
    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        lock_unpoisoned(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        lock_unpoisoned(&self.calls).clone()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        lock_unpoisoned(&self.calls).clear();
    }

    /// Gets the next response or a default.
    fn next_response(&self) -> MockResponse {
        lock_unpoisoned(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success(DEFAULT_MOCK_CONTENT.to_string()))
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        lock_unpoisoned(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success(content) => Ok(CompletionResponse::new(content, self.info.model.clone())),
            MockResponse::Error(error) => Err(error.into()),
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}
