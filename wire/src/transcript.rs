//! Conversation transcript with single-turn-in-flight semantics.
//!
//! Deltas for one assistant turn coalesce into the trailing assistant
//! message, so the transcript never holds two assistant messages in a row.
//! A new turn is refused while the previous reply is still streaming.

use crate::chat::{ChatMessage, Role};
use crate::sse::DeltaSink;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TurnState {
    #[default]
    Idle,
    Streaming,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TranscriptError {
    #[error("message is empty")]
    EmptyInput,
    #[error("a reply is still streaming")]
    Busy,
}

#[derive(Clone, Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    state: TurnState,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn state(&self) -> TurnState {
        self.state
    }

    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.state == TurnState::Streaming
    }

    /// Append a user message and open a new assistant turn.
    ///
    /// Returns the full history to send to the chat proxy.
    ///
    /// # Errors
    ///
    /// [`TranscriptError::EmptyInput`] for blank input,
    /// [`TranscriptError::Busy`] while a reply is streaming.
    pub fn begin_turn(&mut self, input: &str) -> Result<Vec<ChatMessage>, TranscriptError> {
        if input.trim().is_empty() {
            return Err(TranscriptError::EmptyInput);
        }
        if self.is_streaming() {
            return Err(TranscriptError::Busy);
        }
        self.messages.push(ChatMessage::user(input));
        self.state = TurnState::Streaming;
        Ok(self.messages.clone())
    }

    /// Grow the trailing assistant message, creating it on the first delta.
    pub fn push_delta(&mut self, delta: &str) {
        match self.messages.last_mut() {
            Some(last) if last.role == Role::Assistant => last.content.push_str(delta),
            _ => self.messages.push(ChatMessage::assistant(delta)),
        }
    }

    /// Close the current turn after the stream completed.
    pub fn finish_turn(&mut self) {
        self.state = TurnState::Idle;
    }

    /// Close the current turn after a failure. Any partial reply stays.
    pub fn abort_turn(&mut self) {
        self.state = TurnState::Idle;
    }

    /// Content of the trailing assistant message, if the last message is one.
    #[must_use]
    pub fn last_reply(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }
}

impl DeltaSink for Transcript {
    fn on_delta(&mut self, delta: &str) {
        self.push_delta(delta);
    }

    fn on_done(&mut self) {
        self.finish_turn();
    }
}

#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;
