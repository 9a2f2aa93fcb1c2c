//! HTTP client side of the relay contract.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_RELAY_URL: &str = "http://localhost:3000";
pub const CHAT_PATH: &str = "/api/chat";
pub const EMPTY_REPLY: &str = "(Tidak ada respons)";

#[derive(Debug, Error)]
pub enum TransportError {
    /// Non-success response carrying an `error` field.
    #[error("{0}")]
    Relay(String),
    /// Non-success response without a readable error body.
    #[error("HTTP {0}")]
    Status(u16),
    #[error("{0}")]
    Network(#[from] reqwest::Error),
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can carry one chat message to the model and bring back text.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait ChatTransport {
    async fn send(&self, message: &str) -> Result<String, TransportError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatReply {
    reply: Option<String>,
}

#[derive(Deserialize)]
struct ChatFailure {
    error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct RelayClient {
    client: Client,
    endpoint: String,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), CHAT_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl ChatTransport for RelayClient {
    async fn send(&self, message: &str) -> Result<String, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { message })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(failure_from_body(status.as_u16(), &body));
        }
        reply_from_body(&body)
    }
}

fn reply_from_body(body: &str) -> Result<String, TransportError> {
    let parsed: ChatReply = serde_json::from_str(body)?;
    let reply = parsed
        .reply
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| EMPTY_REPLY.to_string());
    Ok(reply)
}

fn failure_from_body(status: u16, body: &str) -> TransportError {
    serde_json::from_str::<ChatFailure>(body)
        .ok()
        .and_then(|failure| failure.error)
        .filter(|error| !error.is_empty())
        .map(TransportError::Relay)
        .unwrap_or(TransportError::Status(status))
}
