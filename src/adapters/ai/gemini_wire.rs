//! Wire types for the Gemini `generateContent` API.
//!
//! A successful body comes in one of two shapes:
//!
//! - **A** (`generateContent`): `{"candidates":[{"content":{"parts":[{"text":..}]}}]}`
//! - **B** (`streamGenerateContent` read into one buffer): a JSON array of
//!   shape-A objects, each carrying a fragment of the text
//!
//! Which one arrives depends on endpoint configuration rather than any
//! contract, so decoding tries B first and falls back to A.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestContent {
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerateContentRequest {
    pub fn new(prompt: impl Into<String>, generation_config: Option<GenerationConfig>) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.into(),
                }],
            }],
            generation_config,
        }
    }
}

/// One response object (shape A, or one element of shape B).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateEnvelope {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}

impl CandidateEnvelope {
    /// Text of the first part of the first candidate, if any.
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

/// A decoded successful response body.
#[derive(Debug, Clone)]
pub enum RemoteResponse {
    /// Shape A.
    SingleCandidate(CandidateEnvelope),
    /// Shape B, in arrival order.
    StreamedChunks(Vec<CandidateEnvelope>),
}

impl RemoteResponse {
    /// Decodes a body, trying the chunk array first.
    pub fn decode(body: &str) -> Option<Self> {
        if let Ok(chunks) = serde_json::from_str::<Vec<CandidateEnvelope>>(body) {
            return Some(RemoteResponse::StreamedChunks(chunks));
        }
        serde_json::from_str::<CandidateEnvelope>(body)
            .ok()
            .map(RemoteResponse::SingleCandidate)
    }

    /// The response text; streamed fragments are concatenated in order.
    pub fn text(&self) -> String {
        match self {
            RemoteResponse::SingleCandidate(envelope) => {
                envelope.first_text().unwrap_or_default().to_string()
            }
            RemoteResponse::StreamedChunks(chunks) => {
                chunks.iter().filter_map(CandidateEnvelope::first_text).collect()
            }
        }
    }
}

/// Plain text of a successful body; empty when neither shape decodes.
pub fn extract_text(body: &str) -> String {
    RemoteResponse::decode(body)
        .map(|response| response.text())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPE_A: &str = r#"{"candidates":[{"content":{"parts":[{"text":"Hello, world"}],"role":"model"},"finishReason":"STOP"}]}"#;
    const SHAPE_B: &str = r#"[
        {"candidates":[{"content":{"parts":[{"text":"Hello, "}],"role":"model"}}]},
        {"candidates":[{"content":{"parts":[{"text":"world"}],"role":"model"},"finishReason":"STOP"}]}
    ]"#;

    #[test]
    fn single_and_streamed_shapes_yield_same_text() {
        assert_eq!(extract_text(SHAPE_A), "Hello, world");
        assert_eq!(extract_text(SHAPE_B), extract_text(SHAPE_A));
    }

    #[test]
    fn array_is_decoded_as_chunks() {
        assert!(matches!(
            RemoteResponse::decode(SHAPE_B),
            Some(RemoteResponse::StreamedChunks(ref chunks)) if chunks.len() == 2
        ));
        assert!(matches!(
            RemoteResponse::decode(SHAPE_A),
            Some(RemoteResponse::SingleCandidate(_))
        ));
    }

    #[test]
    fn chunks_without_text_are_skipped() {
        let body = r#"[
            {"candidates":[{"content":{"parts":[{"text":"a"}]}}]},
            {"candidates":[]},
            {"usageMetadata":{"totalTokenCount":3}},
            {"candidates":[{"content":{"parts":[{"text":"b"}]}}]}
        ]"#;
        assert_eq!(extract_text(body), "ab");
    }

    #[test]
    fn undecodable_bodies_yield_empty_text() {
        assert_eq!(extract_text("not json"), "");
        assert_eq!(extract_text(""), "");
        assert_eq!(extract_text("42"), "");
        assert_eq!(extract_text(r#"{"candidates":[]}"#), "");
    }

    #[test]
    fn request_serializes_gemini_field_names() {
        let request = GenerateContentRequest::new(
            "Hi",
            Some(GenerationConfig {
                temperature: Some(0.2),
                max_output_tokens: Some(256),
            }),
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hi");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 256);
        assert!(json["generationConfig"]["temperature"].is_number());
    }
}
