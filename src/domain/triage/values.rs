//! Value types exchanged between help-desk features and the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category used when nothing more specific applies.
pub const DEFAULT_CATEGORY: &str = "Outros";

/// Reasoning attached to model output that omitted its own explanation.
pub const DEFAULT_AI_REASONING: &str = "Análise realizada pela IA";

/// Confidence attached to model output that omitted its own score.
pub const DEFAULT_AI_CONFIDENCE: f64 = 0.5;

/// A ticket to be triaged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub title: String,
    pub description: String,
}

impl AnalysisRequest {
    /// Creates a new analysis request.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Title and description joined, lowercased, for keyword matching.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

/// Ticket priority as understood by the help desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Parses the labels a model tends to produce, in English or Portuguese.
    ///
    /// Returns `None` for anything unrecognised so callers can decide
    /// whether to substitute the default.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "low" | "baixa" | "baixo" => Some(Priority::Low),
            "medium" | "média" | "media" | "normal" => Some(Priority::Medium),
            "high" | "alta" | "alto" => Some(Priority::High),
            "urgent" | "urgente" | "critical" | "crítica" | "critica" => Some(Priority::Urgent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of triaging a ticket.
///
/// Produced either by the remote model or by the keyword fallback; the two
/// are deliberately indistinguishable apart from `reasoning` and latency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub category: String,
    pub priority: Priority,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub reasoning: String,
    pub processing_time_ms: u64,
}

impl AnalysisResult {
    /// Creates a result, clamping `confidence` into `[0, 1]`.
    pub fn new(
        category: impl Into<String>,
        priority: Priority,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            priority,
            confidence: clamp_confidence(confidence),
            reasoning: reasoning.into(),
            processing_time_ms: 0,
        }
    }

    /// Returns a copy stamped with the given processing time.
    pub fn with_processing_time_ms(mut self, millis: u64) -> Self {
        self.processing_time_ms = millis;
        self
    }
}

/// Tone of a customer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "positive" | "positivo" => Some(Sentiment::Positive),
            "neutral" | "neutro" => Some(Sentiment::Neutral),
            "negative" | "negativo" => Some(Sentiment::Negative),
            _ => None,
        }
    }
}

/// Result of a sentiment analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub reasoning: String,
}

impl SentimentResult {
    pub fn new(sentiment: Sentiment, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self {
            sentiment,
            confidence: clamp_confidence(confidence),
            reasoning: reasoning.into(),
        }
    }
}

/// A reply an agent may send for a ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub ticket_id: String,
    pub suggested_response: String,
    pub confidence: f64,
    pub reasoning: String,
    pub generated_at: DateTime<Utc>,
}

impl Suggestion {
    pub fn new(
        ticket_id: impl Into<String>,
        suggested_response: impl Into<String>,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            suggested_response: suggested_response.into(),
            confidence: clamp_confidence(confidence),
            reasoning: reasoning.into(),
            generated_at: Utc::now(),
        }
    }
}

/// NaN collapses to zero.
fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parses_english_and_portuguese() {
        assert_eq!(Priority::parse_lenient("Urgent"), Some(Priority::Urgent));
        assert_eq!(Priority::parse_lenient(" alta "), Some(Priority::High));
        assert_eq!(Priority::parse_lenient("BAIXA"), Some(Priority::Low));
        assert_eq!(Priority::parse_lenient("média"), Some(Priority::Medium));
        assert_eq!(Priority::parse_lenient("whenever"), None);
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(Priority::Urgent.to_string(), "Urgent");
    }

    #[test]
    fn analysis_result_clamps_confidence() {
        assert_eq!(AnalysisResult::new("Hardware", Priority::Low, 1.7, "x").confidence, 1.0);
        assert_eq!(AnalysisResult::new("Hardware", Priority::Low, -0.2, "x").confidence, 0.0);
        assert_eq!(AnalysisResult::new("Hardware", Priority::Low, f64::NAN, "x").confidence, 0.0);
    }

    #[test]
    fn analysis_result_serializes_camel_case() {
        let result = AnalysisResult::new("Rede", Priority::High, 0.8, "vpn").with_processing_time_ms(12);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["category"], "Rede");
        assert_eq!(json["priority"], "High");
        assert_eq!(json["processingTimeMs"], 12);
    }

    #[test]
    fn sentiment_parses_lenient_labels() {
        assert_eq!(Sentiment::parse_lenient("Negativo"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::parse_lenient("positive"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::parse_lenient("meh"), None);
    }
}
