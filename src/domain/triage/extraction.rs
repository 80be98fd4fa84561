//! Structured payload extraction from free-text model output.
//!
//! Models are asked for a JSON object but routinely wrap it in markdown
//! fences or surround it with prose. Extraction takes the span from the
//! first `{` to the last `}` and decodes that.

use serde::Deserialize;
use serde_json::Value;

use super::values::{
    AnalysisResult, Priority, Sentiment, SentimentResult, DEFAULT_AI_CONFIDENCE,
    DEFAULT_AI_REASONING, DEFAULT_CATEGORY,
};

/// Outcome of decoding an analysis payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Every field was present and usable.
    Complete(AnalysisResult),
    /// An object was decoded but some fields were absent or unusable and
    /// were replaced by their defaults.
    Partial {
        result: AnalysisResult,
        defaulted: Vec<&'static str>,
    },
    /// No usable object in the text.
    Malformed(String),
}

impl ParseOutcome {
    /// The analysis, if the payload was usable at all.
    pub fn into_result(self) -> Option<AnalysisResult> {
        match self {
            ParseOutcome::Complete(result) | ParseOutcome::Partial { result, .. } => Some(result),
            ParseOutcome::Malformed(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(alias = "suggestedCategory", alias = "suggested_category")]
    category: Option<Value>,
    #[serde(alias = "suggestedPriority", alias = "suggested_priority")]
    priority: Option<Value>,
    confidence: Option<Value>,
    reasoning: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawSentiment {
    sentiment: Option<String>,
    confidence: Option<Value>,
    reasoning: Option<String>,
}

/// Returns the slice between the first `{` and the last `}`, inclusive.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Models sometimes quote numbers, and some report percentages.
///
/// Only a `%` suffix or a whole number in 2..=100 reads as a percentage;
/// anything else outside [0, 1] is treated as missing.
fn confidence_value(value: Option<&Value>) -> Option<f64> {
    let (raw, percent) = match value? {
        Value::Number(n) => (n.as_f64()?, false),
        Value::String(s) => match s.trim().strip_suffix('%') {
            Some(pct) => (pct.trim().parse::<f64>().ok()?, true),
            None => (s.trim().parse::<f64>().ok()?, false),
        },
        _ => return None,
    };
    let whole_percent = raw > 1.0 && raw <= 100.0 && raw.fract() == 0.0;
    let normalized = if percent || whole_percent { raw / 100.0 } else { raw };
    (0.0..=1.0).contains(&normalized).then_some(normalized)
}

/// Decodes a ticket analysis embedded in model output.
pub fn extract_analysis(text: &str) -> ParseOutcome {
    let Some(json) = extract_json_object(text) else {
        return ParseOutcome::Malformed("no JSON object found in model output".to_string());
    };

    let raw: RawAnalysis = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(e) => return ParseOutcome::Malformed(format!("invalid JSON object: {}", e)),
    };

    let mut defaulted = Vec::new();

    let category = non_empty_str(raw.category.as_ref()).map(str::to_string).unwrap_or_else(|| {
        defaulted.push("category");
        DEFAULT_CATEGORY.to_string()
    });
    let priority = non_empty_str(raw.priority.as_ref())
        .and_then(Priority::parse_lenient)
        .unwrap_or_else(|| {
            defaulted.push("priority");
            Priority::default()
        });
    let confidence = confidence_value(raw.confidence.as_ref()).unwrap_or_else(|| {
        defaulted.push("confidence");
        DEFAULT_AI_CONFIDENCE
    });
    let reasoning = non_empty_str(raw.reasoning.as_ref()).map(str::to_string).unwrap_or_else(|| {
        defaulted.push("reasoning");
        DEFAULT_AI_REASONING.to_string()
    });

    if defaulted.len() == 4 {
        return ParseOutcome::Malformed("JSON object carried none of the analysis fields".to_string());
    }

    let result = AnalysisResult::new(category, priority, confidence, reasoning);
    if defaulted.is_empty() {
        ParseOutcome::Complete(result)
    } else {
        ParseOutcome::Partial { result, defaulted }
    }
}

/// Decodes a sentiment verdict embedded in model output.
///
/// The sentiment label is mandatory; confidence and reasoning default.
pub fn extract_sentiment(text: &str) -> Option<SentimentResult> {
    let raw: RawSentiment = serde_json::from_str(extract_json_object(text)?).ok()?;
    let sentiment = Sentiment::parse_lenient(raw.sentiment.as_deref()?)?;
    Some(SentimentResult::new(
        sentiment,
        confidence_value(raw.confidence.as_ref()).unwrap_or(DEFAULT_AI_CONFIDENCE),
        raw.reasoning
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AI_REASONING.to_string()),
    ))
}
