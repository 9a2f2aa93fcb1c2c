//! Submission lifecycle of the chat client.
//!
//! A submission moves Idle → Validating → Sending → AwaitingResponse →
//! (Success | Failure) → Idle. Validating and Sending happen synchronously in
//! [`ChatSession::begin`]; the session then waits in
//! [`Phase::AwaitingResponse`] until [`ChatSession::complete`] records the
//! outcome. Only one request may be outstanding at a time.

use crate::history::ChatHistory;
use crate::relay_client::{ChatTransport, TransportError};
use crate::types::{Message, Role};
use thiserror::Error;

pub const MAX_INPUT_CHARS: usize = 500;
pub const ERROR_REPLY_PREFIX: &str = "Maaf, terjadi kesalahan: ";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("message is empty")]
    Blank,
    #[error("Maksimal {max} karakter.")]
    TooLong { max: usize },
    #[error("a reply is still pending")]
    Busy,
}

impl InputError {
    /// Text to show the user, if this rejection warrants an alert.
    pub fn alert(&self) -> Option<String> {
        match self {
            InputError::TooLong { .. } => Some(self.to_string()),
            InputError::Blank | InputError::Busy => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingResponse,
}

/// Trim and bound-check composer input.
pub fn validate_input(input: &str) -> Result<&str, InputError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(InputError::Blank);
    }
    if text.chars().count() > MAX_INPUT_CHARS {
        return Err(InputError::TooLong {
            max: MAX_INPUT_CHARS,
        });
    }
    Ok(text)
}

#[derive(Debug)]
pub struct ChatSession {
    history: ChatHistory,
    phase: Phase,
}

impl ChatSession {
    pub fn new(history: ChatHistory) -> Self {
        Self {
            history,
            phase: Phase::Idle,
        }
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a reply is pending: the typing indicator shows and sending is disabled.
    pub fn is_awaiting(&self) -> bool {
        self.phase == Phase::AwaitingResponse
    }

    /// Validate the input and, if accepted, record the user turn and enter
    /// [`Phase::AwaitingResponse`]. Returns the text to send.
    pub fn begin(&mut self, input: &str) -> Result<String, InputError> {
        if self.is_awaiting() {
            return Err(InputError::Busy);
        }
        let text = validate_input(input)?.to_string();
        self.history.push(Role::User, text.clone());
        self.phase = Phase::AwaitingResponse;
        Ok(text)
    }

    /// Record the outcome of the pending request as an assistant turn and return to idle.
    /// Failures become ordinary assistant turns describing the error.
    pub fn complete(&mut self, outcome: Result<String, TransportError>) -> &Message {
        let content = match outcome {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!("chat request failed: {err}");
                format!("{ERROR_REPLY_PREFIX}{err}")
            }
        };
        self.phase = Phase::Idle;
        self.history.push(Role::Assistant, content)
    }

    /// Run a whole submission against `transport`.
    pub async fn submit<T>(&mut self, input: &str, transport: &T) -> Result<&Message, InputError>
    where
        T: ChatTransport + ?Sized,
    {
        let text = self.begin(input)?;
        let outcome = transport.send(&text).await;
        Ok(self.complete(outcome))
    }
}
