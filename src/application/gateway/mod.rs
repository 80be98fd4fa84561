//! AI gateway - the single path from help-desk features to the remote model.
//!
//! Every operation follows the same shape:
//!
//! ```text
//! cache lookup ──hit──▶ return
//!      │ miss
//!      ▼
//! mock-only? ─ configured? ─ breaker open? ─ throttle ──▶ retrier ──▶ provider
//!      │ rejected / exhausted / malformed                         │ ok
//!      ▼                                                          ▼
//! keyword fallback ──────────────▶ cache store ◀──────────── parse payload
//! ```
//!
//! Callers never see transport or parse errors. Structured operations
//! return a fallback value and free text returns an apology.

mod prompts;
mod retry;

pub use retry::{BackoffRetrier, RetryPolicy};

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use crate::adapters::{
    GeminiConfig, GeminiProvider, InMemoryAnalysisCache, InMemoryCircuitBreaker, IntervalThrottle,
};
use crate::config::AppConfig;
use crate::domain::triage::{
    extract_analysis, extract_sentiment, fallback, fingerprint, templates, AnalysisRequest,
    AnalysisResult, ParseOutcome, SentimentResult, Suggestion,
};
use crate::ports::{
    AIError, AIProvider, AnalysisCache, CircuitBreaker, CircuitBreakerConfig, CompletionRequest,
    ProviderInfo, Throttle,
};

/// Returned by `send_free_text` whenever no model text is available.
pub const APOLOGY_MESSAGE: &str =
    "Desculpe, não foi possível processar sua solicitação no momento. Tente novamente mais tarde.";

/// Tuning for one gateway instance.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewaySettings {
    /// Key shared by the throttle and the breaker.
    pub endpoint_key: String,
    /// Skip the remote service entirely.
    pub mock_only: bool,
    pub retry: RetryPolicy,
    /// Wall-clock budget for a single attempt.
    pub attempt_timeout: Duration,
    pub min_interval: Duration,
    pub failure_threshold: u32,
    pub breaker_timeout: Duration,
    pub cache_ttl: Duration,
    pub max_cache_size: usize,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl GatewaySettings {
    /// Derives settings from loaded configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let resilience = &config.resilience;
        Self {
            endpoint_key: resilience.endpoint_key.clone(),
            mock_only: config.ai.mock_only,
            retry: RetryPolicy::new(resilience.max_retries, resilience.base_delay()),
            attempt_timeout: config.ai.timeout(),
            min_interval: resilience.min_interval(),
            failure_threshold: resilience.max_consecutive_failures,
            breaker_timeout: resilience.circuit_breaker_timeout(),
            cache_ttl: resilience.cache_ttl(),
            max_cache_size: resilience.max_cache_size,
            temperature: Some(config.ai.temperature),
            max_output_tokens: Some(config.ai.max_output_tokens),
        }
    }
}

/// Why a remote call did not produce text.
#[derive(Debug, Clone, Error)]
pub enum RemoteCallError {
    #[error("mock-only mode is enabled")]
    MockOnly,

    #[error("no API key configured")]
    NotConfigured,

    #[error("circuit breaker is open")]
    CircuitOpen,

    #[error("throttled: minimum interval between calls not yet elapsed")]
    Throttled,

    #[error(transparent)]
    Failed(#[from] AIError),
}

impl RemoteCallError {
    /// Rejections that reflect configuration rather than a fault.
    pub fn is_expected(&self) -> bool {
        matches!(self, RemoteCallError::MockOnly | RemoteCallError::NotConfigured)
    }
}

/// Snapshot of the shared state for the gateway's endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointHealth {
    pub key: String,
    /// Last time a remote call was admitted past the throttle.
    pub last_call_at: Option<Instant>,
    pub consecutive_failures: u32,
    pub breaker_open: bool,
    pub breaker_opened_at: Option<Instant>,
}

/// Resilient front for the remote text-generation service.
///
/// Cheap to share behind an `Arc`; all mutable state lives in the cache,
/// throttle and breaker adapters, each guarded by its own lock.
pub struct AiGateway {
    settings: GatewaySettings,
    provider: Arc<dyn AIProvider>,
    cache: Arc<dyn AnalysisCache>,
    throttle: Arc<dyn Throttle>,
    circuit_breaker: Arc<dyn CircuitBreaker>,
}

impl AiGateway {
    /// Creates a gateway with in-memory cache, throttle and breaker sized
    /// from `settings`.
    pub fn new(settings: GatewaySettings, provider: Arc<dyn AIProvider>) -> Self {
        let cache = Arc::new(InMemoryAnalysisCache::new(
            settings.cache_ttl,
            settings.max_cache_size,
        ));
        let throttle = Arc::new(IntervalThrottle::new(settings.min_interval));
        let circuit_breaker = Arc::new(InMemoryCircuitBreaker::new(
            settings.endpoint_key.clone(),
            CircuitBreakerConfig::new(settings.failure_threshold, settings.breaker_timeout),
        ));

        Self {
            settings,
            provider,
            cache,
            throttle,
            circuit_breaker,
        }
    }

    /// Builds the production gateway: Gemini provider plus in-memory state.
    pub fn from_config(config: &AppConfig) -> Result<Self, AIError> {
        let ai = &config.ai;
        let gemini = GeminiConfig::new(ai.api_key.clone())
            .with_model(ai.model.clone())
            .with_base_url(ai.base_url.clone())
            .with_timeout(ai.timeout())
            .with_streaming(ai.streaming)
            .with_generation_defaults(Some(ai.temperature), Some(ai.max_output_tokens));
        let provider = GeminiProvider::new(gemini)?;

        Ok(Self::new(GatewaySettings::from_config(config), Arc::new(provider)))
    }

    pub fn with_cache(mut self, cache: Arc<dyn AnalysisCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_throttle(mut self, throttle: Arc<dyn Throttle>) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_circuit_breaker(mut self, circuit_breaker: Arc<dyn CircuitBreaker>) -> Self {
        self.circuit_breaker = circuit_breaker;
        self
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    pub fn provider_info(&self) -> ProviderInfo {
        self.provider.provider_info()
    }

    /// Triage a ticket. Always returns a result.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        let started = Instant::now();
        let key = fingerprint(&request.title, &request.description);

        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(fingerprint = %key, "analysis served from cache");
            return cached.with_processing_time_ms(elapsed_ms(started));
        }

        let result = match self.call_remote(prompts::ticket_analysis(request)).await {
            Ok(text) => self
                .parse_analysis(&text)
                .unwrap_or_else(|| fallback::classify(request)),
            Err(err) => {
                log_fallback("analyze", &err);
                fallback::classify(request)
            }
        }
        .with_processing_time_ms(elapsed_ms(started));

        self.cache.put(&key, result.clone());
        result
    }

    /// Proposes a reply for a ticket. Always returns a suggestion.
    ///
    /// On remote success the reply template follows the model's category
    /// and echoes its confidence and reasoning; otherwise the template for
    /// `issue_type` is used as is.
    pub async fn generate_response_suggestion(
        &self,
        ticket_id: &str,
        issue_type: &str,
        user_message: &str,
    ) -> Suggestion {
        let analysis = match self
            .call_remote(prompts::suggestion_analysis(issue_type, user_message))
            .await
        {
            Ok(text) => self.parse_analysis(&text),
            Err(err) => {
                log_fallback("suggest", &err);
                None
            }
        };

        match analysis {
            Some(analysis) => {
                let reply = templates::with_analysis_echo(
                    templates::reply_for(&analysis.category),
                    analysis.confidence,
                    &analysis.reasoning,
                );
                Suggestion::new(ticket_id, reply, analysis.confidence, analysis.reasoning)
            }
            None => Suggestion::new(
                ticket_id,
                templates::reply_for(issue_type),
                templates::TEMPLATE_CONFIDENCE,
                templates::TEMPLATE_REASONING,
            ),
        }
    }

    /// Classifies the sentiment of a message. Always returns a result.
    pub async fn analyze_sentiment(&self, message: &str) -> SentimentResult {
        match self.call_remote(prompts::sentiment(message)).await {
            Ok(text) => match extract_sentiment(&text) {
                Some(result) => result,
                None => {
                    tracing::warn!("sentiment payload unusable, using keyword fallback");
                    fallback::analyze_sentiment(message)
                }
            },
            Err(err) => {
                log_fallback("sentiment", &err);
                fallback::analyze_sentiment(message)
            }
        }
    }

    /// Sends a raw prompt and returns the model text, or an apology.
    ///
    /// Not cached.
    pub async fn send_free_text(&self, prompt: &str) -> String {
        match self.call_remote(prompt.to_string()).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!("provider returned no text");
                APOLOGY_MESSAGE.to_string()
            }
            Err(err) => {
                log_fallback("free_text", &err);
                APOLOGY_MESSAGE.to_string()
            }
        }
    }

    /// Whether a call made now would reach the remote service.
    ///
    /// A snapshot only; a call made right after may still fail.
    pub fn is_available(&self) -> bool {
        if self.settings.mock_only {
            return true;
        }
        self.provider.is_configured()
            && !self.circuit_breaker.is_open()
            && self.throttle.allow(&self.settings.endpoint_key)
    }

    /// Shared state for the endpoint.
    pub fn health(&self) -> EndpointHealth {
        let breaker_open = self.circuit_breaker.is_open();
        let metrics = self.circuit_breaker.metrics();
        let breaker_opened_at = metrics
            .open_for
            .and_then(|open_for| Instant::now().checked_sub(open_for));

        EndpointHealth {
            key: self.settings.endpoint_key.clone(),
            last_call_at: self.throttle.last_attempt(&self.settings.endpoint_key),
            consecutive_failures: metrics.consecutive_failures,
            breaker_open,
            breaker_opened_at,
        }
    }

    /// Number of analyses currently cached.
    pub fn cached_analyses(&self) -> usize {
        self.cache.len()
    }

    /// Checks the gates in order, stamping the throttle only when a call
    /// will actually be made.
    fn admit(&self) -> Result<(), RemoteCallError> {
        if self.settings.mock_only {
            return Err(RemoteCallError::MockOnly);
        }
        if !self.provider.is_configured() {
            return Err(RemoteCallError::NotConfigured);
        }
        if self.circuit_breaker.is_open() {
            return Err(RemoteCallError::CircuitOpen);
        }
        if !self.throttle.try_acquire(&self.settings.endpoint_key) {
            return Err(RemoteCallError::Throttled);
        }
        Ok(())
    }

    async fn call_remote(&self, prompt: String) -> Result<String, RemoteCallError> {
        self.admit()?;

        let mut request = CompletionRequest::new(prompt);
        if let Some(temperature) = self.settings.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max) = self.settings.max_output_tokens {
            request = request.with_max_output_tokens(max);
        }

        let timeout = self.settings.attempt_timeout;
        let provider = &self.provider;
        let retrier = BackoffRetrier::new(self.settings.retry, self.circuit_breaker.clone());

        let response = retrier
            .execute(|attempt| {
                let request = request.clone();
                async move {
                    tracing::debug!(trace_id = %request.trace_id, attempt, "calling provider");
                    match tokio::time::timeout(timeout, provider.complete(request)).await {
                        Ok(result) => result,
                        Err(_) => Err(AIError::Timeout {
                            timeout_secs: timeout.as_secs(),
                        }),
                    }
                }
            })
            .await?;

        Ok(response.content)
    }

    /// Malformed payloads return `None` without touching the breaker; the
    /// transport success was already recorded.
    fn parse_analysis(&self, text: &str) -> Option<AnalysisResult> {
        match extract_analysis(text) {
            ParseOutcome::Complete(result) => Some(result),
            ParseOutcome::Partial { result, defaulted } => {
                tracing::debug!(?defaulted, "analysis payload incomplete, defaults applied");
                Some(result)
            }
            ParseOutcome::Malformed(reason) => {
                tracing::warn!(%reason, "analysis payload malformed, using keyword fallback");
                None
            }
        }
    }
}

fn log_fallback(operation: &'static str, err: &RemoteCallError) {
    if err.is_expected() {
        tracing::debug!(operation, reason = %err, "remote call skipped");
    } else {
        tracing::warn!(operation, error = %err, "remote call failed, using fallback");
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockAIProvider, MockError};
    use crate::domain::triage::{Priority, Sentiment};

    fn settings() -> GatewaySettings {
        GatewaySettings {
            min_interval: Duration::ZERO,
            ..GatewaySettings::default()
        }
    }

    fn gateway(provider: &MockAIProvider) -> AiGateway {
        AiGateway::new(settings(), Arc::new(provider.clone()))
    }

    const HARDWARE_JSON: &str = r#"{"category":"Hardware","priority":"High","confidence":0.9,"reasoning":"printer"}"#;

    #[test]
    fn settings_follow_config_defaults() {
        let settings = GatewaySettings::default();
        assert_eq!(settings.endpoint_key, "gemini");
        assert_eq!(settings.retry.max_retries, 3);
        assert_eq!(settings.min_interval, Duration::from_secs(2));
        assert_eq!(settings.attempt_timeout, Duration::from_secs(60));
        assert!(!settings.mock_only);
    }

    #[tokio::test]
    async fn remote_analysis_is_parsed_and_cached() {
        let provider = MockAIProvider::new().with_response(HARDWARE_JSON);
        let gateway = gateway(&provider);
        let request = AnalysisRequest::new("Impressora", "não liga");

        let first = gateway.analyze(&request).await;
        let second = gateway.analyze(&AnalysisRequest::new("  IMPRESSORA ", "não liga")).await;

        assert_eq!(first.category, "Hardware");
        assert_eq!(first.priority, Priority::High);
        assert_eq!(second.category, "Hardware");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(gateway.cached_analyses(), 1);
    }

    #[tokio::test]
    async fn request_carries_generation_settings() {
        let provider = MockAIProvider::new().with_response(HARDWARE_JSON);
        let gateway = gateway(&provider);

        gateway.analyze(&AnalysisRequest::new("a", "b")).await;

        let call = &provider.get_calls()[0];
        assert_eq!(call.temperature, Some(0.2));
        assert_eq!(call.max_output_tokens, Some(1024));
        assert!(call.prompt.contains("Título: a"));
    }

    #[tokio::test]
    async fn unconfigured_provider_is_never_called() {
        let provider = MockAIProvider::new().unconfigured();
        let gateway = gateway(&provider);

        let result = gateway
            .analyze(&AnalysisRequest::new("Sem internet", "wifi caiu"))
            .await;

        assert_eq!(result.category, "Rede");
        assert_eq!(result.reasoning, fallback::FALLBACK_REASONING);
        assert_eq!(provider.call_count(), 0);
        assert!(!gateway.is_available());
    }

    #[tokio::test]
    async fn mock_only_skips_provider_but_reports_available() {
        let provider = MockAIProvider::new();
        let gateway = AiGateway::new(
            GatewaySettings {
                mock_only: true,
                ..settings()
            },
            Arc::new(provider.clone()),
        );

        let result = gateway.analyze(&AnalysisRequest::new("Senha", "esqueci")).await;

        assert_eq!(result.category, "Acesso");
        assert_eq!(provider.call_count(), 0);
        assert!(gateway.is_available());
    }

    #[tokio::test]
    async fn malformed_payload_falls_back_without_breaker_failure() {
        let provider = MockAIProvider::new().with_response("no json here");
        let gateway = gateway(&provider);

        let result = gateway.analyze(&AnalysisRequest::new("Outlook", "email parado")).await;

        assert_eq!(result.category, "Email");
        assert_eq!(gateway.health().consecutive_failures, 0);
    }

    #[tokio::test]
    async fn non_retryable_status_is_one_failure() {
        let provider = MockAIProvider::new().with_error(MockError::Status { status: 500 });
        let gateway = gateway(&provider);

        gateway.analyze(&AnalysisRequest::new("x", "y")).await;

        assert_eq!(provider.call_count(), 1);
        assert_eq!(gateway.health().consecutive_failures, 1);
    }

    #[tokio::test]
    async fn suggestion_uses_model_category_and_echo() {
        let provider = MockAIProvider::new().with_response(HARDWARE_JSON);
        let gateway = gateway(&provider);

        let suggestion = gateway
            .generate_response_suggestion("T-1", "Rede", "a impressora travou")
            .await;

        assert_eq!(suggestion.ticket_id, "T-1");
        assert!(suggestion.suggested_response.starts_with(templates::reply_for("Hardware")));
        assert!(suggestion.suggested_response.contains("90%"));
        assert!((suggestion.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn suggestion_falls_back_to_issue_type_template() {
        let provider = MockAIProvider::new().unconfigured();
        let gateway = gateway(&provider);

        let suggestion = gateway
            .generate_response_suggestion("T-2", "Rede", "sem conexão")
            .await;

        assert_eq!(suggestion.suggested_response, templates::reply_for("Rede"));
        assert_eq!(suggestion.reasoning, templates::TEMPLATE_REASONING);
    }

    #[tokio::test]
    async fn sentiment_from_model_and_fallback() {
        let provider = MockAIProvider::new()
            .with_response(r#"{"sentiment":"positive","confidence":0.8,"reasoning":"thanks"}"#)
            .with_response("garbage");
        let gateway = gateway(&provider);

        let remote = gateway.analyze_sentiment("valeu").await;
        let fallback = gateway.analyze_sentiment("isso é um absurdo, péssimo").await;

        assert_eq!(remote.sentiment, Sentiment::Positive);
        assert_eq!(fallback.sentiment, Sentiment::Negative);
        assert_eq!(fallback.reasoning, fallback::FALLBACK_REASONING);
    }

    #[tokio::test]
    async fn free_text_returns_apology_on_empty_or_failed_call() {
        let provider = MockAIProvider::new()
            .with_response("Resumo pronto")
            .with_response("   ")
            .with_error(MockError::Status { status: 400 });
        let gateway = gateway(&provider);

        assert_eq!(gateway.send_free_text("resuma").await, "Resumo pronto");
        assert_eq!(gateway.send_free_text("resuma").await, APOLOGY_MESSAGE);
        assert_eq!(gateway.send_free_text("resuma").await, APOLOGY_MESSAGE);
        assert_eq!(gateway.cached_analyses(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_attempt_times_out_and_is_retried() {
        let provider = MockAIProvider::new().with_delay(Duration::from_secs(120));
        let gateway = AiGateway::new(
            GatewaySettings {
                retry: RetryPolicy::new(1, Duration::from_millis(10)),
                ..settings()
            },
            Arc::new(provider.clone()),
        );

        let result = gateway.analyze(&AnalysisRequest::new("Teclado", "quebrado")).await;

        assert_eq!(result.category, "Hardware");
        assert_eq!(provider.call_count(), 2);
        assert_eq!(gateway.health().consecutive_failures, 2);
    }

    #[tokio::test]
    async fn throttle_stamp_shows_in_health() {
        let provider = MockAIProvider::new().with_response(HARDWARE_JSON);
        let gateway = gateway(&provider);
        assert!(gateway.health().last_call_at.is_none());

        gateway.send_free_text("oi").await;

        let health = gateway.health();
        assert_eq!(health.key, "gemini");
        assert!(health.last_call_at.is_some());
        assert!(!health.breaker_open);
        assert!(health.breaker_opened_at.is_none());
    }
}
