//! Ticket triage - values and pure logic shared by the gateway.
//!
//! - `values` - requests, results, priorities, sentiment, suggestions
//! - `fingerprint` - cache keys for ticket text
//! - `extraction` - decoding JSON payloads embedded in model output
//! - `fallback` - keyword classifier used when the model is unavailable
//! - `templates` - canned replies keyed by issue type

pub mod extraction;
pub mod fallback;
pub mod fingerprint;
pub mod templates;
mod values;

pub use extraction::{extract_analysis, extract_json_object, extract_sentiment, ParseOutcome};
pub use fingerprint::fingerprint;
pub use values::{
    AnalysisRequest, AnalysisResult, Priority, Sentiment, SentimentResult, Suggestion,
    DEFAULT_AI_CONFIDENCE, DEFAULT_AI_REASONING, DEFAULT_CATEGORY,
};
