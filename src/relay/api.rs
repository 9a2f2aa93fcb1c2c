use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use super::config::RelayConfig;
use super::generator::{GeminiGenerator, TextGenerator};
use super::rate_limit::RateLimiter;

pub const MAX_MESSAGE_CHARS: usize = 500;
pub const EMPTY_UPSTREAM_REPLY: &str = "Maaf, tidak ada respons.";
pub const UNEXPECTED_ERROR: &str = "Terjadi kesalahan tak terduga.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Pesan tidak boleh kosong.")]
    EmptyMessage,
    #[error("Panjang pesan maksimal {0} karakter.")]
    MessageTooLong(usize),
    #[error("{0}")]
    MalformedBody(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("Server belum dikonfigurasi GEMINI_API_KEY.")]
    NotConfigured,
    #[error("{0}")]
    Upstream(String),
    #[error("Terlalu banyak permintaan, coba lagi nanti.")]
    RateLimited,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyMessage | ApiError::MessageTooLong(_) | ApiError::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotConfigured | ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Bodies over the size limit keep their 413; every other rejection is a 400.
    fn rejected(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::MalformedBody(rejection.body_text())
        }
    }

    fn upstream(err: anyhow::Error) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            ApiError::Upstream(UNEXPECTED_ERROR.to_string())
        } else {
            ApiError::Upstream(message)
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    /// Absent when no credential is configured.
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: RelayConfig, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        let limiter = RateLimiter::per_minute(config.rate_limit_max);
        Self {
            config: Arc::new(config),
            generator,
            limiter: Arc::new(limiter),
        }
    }

    /// Wire the Gemini generator when the credential is present.
    pub fn from_config(config: RelayConfig) -> Self {
        let generator = config.api_key.as_deref().map(|key| {
            Arc::new(GeminiGenerator::new(key, config.model.clone())) as Arc<dyn TextGenerator>
        });
        Self::new(config, generator)
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub model: String,
    pub time: String,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let time = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    Json(HealthResponse {
        ok: true,
        model: state.config.model.clone(),
        time,
    })
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// `message` as trimmed text; anything that is not a string counts as empty.
fn message_text(payload: &Value) -> &str {
    payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(payload) = payload.map_err(ApiError::rejected)?;
    let text = message_text(&payload);

    if text.is_empty() {
        return Err(ApiError::EmptyMessage);
    }
    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::MessageTooLong(MAX_MESSAGE_CHARS));
    }
    let Some(generator) = state.generator.as_ref() else {
        return Err(ApiError::NotConfigured);
    };

    let reply = generator.generate(text).await.map_err(|err| {
        tracing::error!("[API ERROR] {err:#}");
        ApiError::upstream(err)
    })?;
    let reply = if reply.is_empty() {
        EMPTY_UPSTREAM_REPLY.to_string()
    } else {
        reply
    };

    Ok(Json(ChatResponse { reply }))
}
