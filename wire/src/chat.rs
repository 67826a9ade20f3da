//! Chat request model and transport failure classification.

use serde::{Deserialize, Serialize};

/// Author of a transcript message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in a chat transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Body of `POST /api/chat`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    /// Pincode the user is asking about. May be empty.
    #[serde(default)]
    pub pincode: String,
}

/// Failure to open a chat stream, classified from the HTTP status returned
/// before any body bytes were read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// HTTP 429 from the proxy.
    #[error("Rate limit exceeded. Please try again in a few moments.")]
    RateLimited,
    /// HTTP 402 from the proxy.
    #[error("AI service is temporarily unavailable.")]
    Unavailable,
    /// Any other non-success status.
    #[error("Failed to start stream (HTTP {0})")]
    Http(u16),
}

impl TransportError {
    /// Classify an HTTP status. Returns `None` for 2xx.
    #[must_use]
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            429 => Some(Self::RateLimited),
            402 => Some(Self::Unavailable),
            other => Some(Self::Http(other)),
        }
    }

    /// HTTP status code this error corresponds to.
    #[must_use]
    pub fn status(self) -> u16 {
        match self {
            Self::RateLimited => 429,
            Self::Unavailable => 402,
            Self::Http(status) => status,
        }
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
