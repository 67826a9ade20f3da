//! OpenAI-compatible streaming chat client.
//!
//! Talks to `/chat/completions` with `stream: true` and hands back the raw
//! SSE body. Any gateway that speaks the same wire format works by pointing
//! `LLM_BASE_URL` at it.

use std::time::Duration;

use futures::{StreamExt, TryStreamExt};
use serde::Serialize;
use wire::ChatMessage;

use super::config::LlmConfig;
use super::types::{ChatByteStream, LlmError};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    max_tokens: u32,
}

impl OpenAiClient {
    /// Build a client from parsed config.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the TLS backend fails to load.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// Open a streaming completion.
    ///
    /// # Errors
    ///
    /// [`LlmError::ApiRequest`] when the request cannot be sent,
    /// [`LlmError::ApiResponse`] for a non-success status.
    pub async fn stream_chat(
        &self,
        model: &str,
        system: &str,
        messages: &[ChatMessage],
    ) -> Result<ChatByteStream, LlmError> {
        let msgs = build_messages(system, messages);
        let body = CcRequest { model, max_tokens: self.max_tokens, messages: &msgs, stream: true };
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiResponse { status, body: text });
        }

        Ok(response
            .bytes_stream()
            .map_err(|e| LlmError::Stream(e.to_string()))
            .boxed())
    }
}

// =============================================================================
// CHAT COMPLETIONS WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [CcMessage<'a>],
    stream: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct CcMessage<'a> {
    role: &'a str,
    content: &'a str,
}

fn build_messages<'a>(system: &'a str, messages: &'a [ChatMessage]) -> Vec<CcMessage<'a>> {
    let mut out = Vec::with_capacity(messages.len() + 1);
    if !system.trim().is_empty() {
        out.push(CcMessage { role: "system", content: system });
    }
    out.extend(
        messages
            .iter()
            .map(|m| CcMessage { role: m.role.as_str(), content: &m.content }),
    );
    out
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
