//! LLM: streaming provider adapter for the health chat proxy.
//!
//! DESIGN
//! ======
//! Configured from environment variables. The chat proxy only relays the
//! provider's SSE body, so the client speaks the OpenAI-compatible
//! `/chat/completions` streaming format that the browser-side reader
//! understands.

pub mod config;
pub mod openai;
pub mod types;

use config::LlmConfig;
pub use types::ChatUpstream;
use types::{ChatByteStream, LlmError};
use wire::ChatMessage;

// =============================================================================
// CLIENT
// =============================================================================

/// Concrete LLM client, configured by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: openai::OpenAiClient,
    model: String,
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = openai::OpenAiClient::new(&config)?;
        Ok(Self { inner, model: config.model })
    }
}

#[async_trait::async_trait]
impl ChatUpstream for LlmClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn stream_chat(&self, system: &str, messages: &[ChatMessage]) -> Result<ChatByteStream, LlmError> {
        self.inner.stream_chat(&self.model, system, messages).await
    }
}
