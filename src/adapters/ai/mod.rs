//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `GeminiProvider` - Google Gemini `generateContent` / `streamGenerateContent`
//! - `MockAIProvider` - Configurable mock for testing

mod gemini_provider;
pub mod gemini_wire;
mod mock_provider;

pub(crate) use gemini_provider::is_real_key;
pub use gemini_provider::{GeminiConfig, GeminiProvider};
pub use gemini_wire::{extract_text, RemoteResponse};
pub use mock_provider::{MockAIProvider, MockError, MockResponse, DEFAULT_MOCK_CONTENT};
