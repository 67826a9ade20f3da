//! LLM types: streaming upstream trait and errors.
//!
//! Provider-neutral surface used by the chat proxy. The upstream returns the
//! provider's raw `text/event-stream` body so it can be relayed to the client
//! byte-for-byte.

use axum::body::Bytes;
use futures::stream::BoxStream;
use wire::ChatMessage;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the LLM provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The response body failed mid-stream.
    #[error("API stream failed: {0}")]
    Stream(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl LlmError {
    /// Upstream HTTP status, when the provider answered with one.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::ApiResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Raw SSE body chunks from the provider.
pub type ChatByteStream = BoxStream<'static, Result<Bytes, LlmError>>;

// =============================================================================
// UPSTREAM TRAIT
// =============================================================================

/// Streaming chat provider. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatUpstream: Send + Sync {
    /// Model identifier used for requests, for logging.
    fn model(&self) -> &str;

    /// Open a streaming completion for `messages` preceded by `system`.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request cannot be sent or the provider
    /// answers with a non-success status before streaming starts.
    async fn stream_chat(&self, system: &str, messages: &[ChatMessage]) -> Result<ChatByteStream, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
