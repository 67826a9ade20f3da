//! Health chat proxy.
//!
//! DESIGN
//! ======
//! Receives a conversation from an authenticated user, prepends a
//! health-assistant system prompt (with recent local alerts when a valid
//! pincode is supplied), and opens a streaming completion. The provider's
//! SSE body is handed back untouched for the route to relay.
//!
//! ERROR HANDLING
//! ==============
//! Provider 402 and 429 are surfaced as-is so the client can tell "rate
//! limited" from "temporarily unavailable". Anything else the provider does
//! wrong becomes a 502. Failures after streaming starts are not observable
//! here; the client sees a truncated body.

use std::fmt::Write;
use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{info, warn};
use wire::{ChatRequest, OutbreakRecord};

use super::session::SessionUser;
use crate::llm::ChatUpstream;
use crate::llm::types::{ChatByteStream, LlmError};
use crate::rate_limit::RateLimitError;
use crate::state::AppState;

/// Alerts included in the system prompt for a pincode.
const PROMPT_ALERT_LIMIT: i64 = 5;

const BASE_PROMPT: &str = "You are HealthWatch, a public health assistant. \
Answer questions about symptoms, prevention, and local disease outbreaks in plain language. \
You are not a doctor: for severe or worsening symptoms, tell the user to seek medical care. \
Keep answers short and practical.";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ChatProxyError {
    #[error("conversation is empty")]
    EmptyConversation,
    #[error("Rate limit exceeded, please try again later")]
    RateLimited(#[from] RateLimitError),
    #[error("AI service is not configured")]
    NotConfigured,
    #[error("AI service temporarily unavailable")]
    ProviderUnavailable,
    #[error("Rate limit exceeded, please try again later")]
    ProviderRateLimited,
    #[error("AI service error: {0}")]
    Upstream(LlmError),
}

impl ChatProxyError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyConversation => StatusCode::BAD_REQUEST,
            Self::RateLimited(_) | Self::ProviderRateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::NotConfigured | Self::ProviderUnavailable => StatusCode::PAYMENT_REQUIRED,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<LlmError> for ChatProxyError {
    fn from(e: LlmError) -> Self {
        match e.upstream_status() {
            Some(402) => Self::ProviderUnavailable,
            Some(429) => Self::ProviderRateLimited,
            _ => Self::Upstream(e),
        }
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Open a streaming completion for `request` on behalf of `user`.
///
/// # Errors
///
/// See [`ChatProxyError`]; each variant maps to one HTTP status.
pub async fn open_chat_stream(
    state: &AppState,
    user: &SessionUser,
    request: ChatRequest,
) -> Result<ChatByteStream, ChatProxyError> {
    if request.messages.is_empty() {
        return Err(ChatProxyError::EmptyConversation);
    }
    let llm: Arc<dyn ChatUpstream> = state.llm.clone().ok_or(ChatProxyError::NotConfigured)?;

    state.rate_limiter.check_and_record(user.id)?;

    let alerts = local_alerts(state, &request.pincode).await;
    let system = build_system_prompt(&request.pincode, &alerts);

    info!(
        user_id = %user.id,
        messages = request.messages.len(),
        alerts = alerts.len(),
        model = llm.model(),
        "chat: opening stream"
    );

    let stream = llm.stream_chat(&system, &request.messages).await.map_err(|e| {
        warn!(user_id = %user.id, error = %e, "chat: provider rejected request");
        ChatProxyError::from(e)
    })?;
    Ok(stream)
}

/// Recent alerts for a valid pincode. Lookup failures only cost context.
async fn local_alerts(state: &AppState, raw_pincode: &str) -> Vec<OutbreakRecord> {
    let Ok(pincode) = wire::validate_pincode(raw_pincode) else {
        return Vec::new();
    };
    match state.outbreaks.list_by_pincode(pincode, Some(PROMPT_ALERT_LIMIT)).await {
        Ok(alerts) => alerts,
        Err(e) => {
            warn!(%pincode, error = %e, "chat: alert lookup failed");
            Vec::new()
        }
    }
}

// =============================================================================
// PROMPT
// =============================================================================

/// Build the system prompt, listing `alerts` when the pincode is valid.
#[must_use]
pub fn build_system_prompt(raw_pincode: &str, alerts: &[OutbreakRecord]) -> String {
    let mut prompt = String::from(BASE_PROMPT);
    let Ok(pincode) = wire::validate_pincode(raw_pincode) else {
        return prompt;
    };

    let _ = write!(prompt, "\n\nThe user's pincode is {pincode}.");
    if alerts.is_empty() {
        prompt.push_str(" There are no recorded outbreak alerts for this area.");
        return prompt;
    }

    prompt.push_str(" Recent outbreak alerts for this area:");
    for alert in alerts {
        let _ = write!(prompt, "\n- {} ({} cases, {})", alert.disease_name, alert.cases, alert.date);
        if !alert.advice.is_empty() {
            let _ = write!(prompt, ": {}", alert.advice);
        }
    }
    prompt
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
