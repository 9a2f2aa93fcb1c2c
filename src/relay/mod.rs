//! HTTP relay between the chat client and Gemini.
//!
//! - `api` - request handlers, shared state and the error-to-JSON mapping
//! - `config` - environment-driven settings
//! - `generator` - the upstream model seam and its Gemini implementation
//! - `rate_limit` - fixed-window limiting for the `/api` routes

mod api;
mod config;
mod generator;
mod rate_limit;

pub use api::{
    ApiError, AppState, ChatResponse, EMPTY_UPSTREAM_REPLY, HealthResponse, MAX_MESSAGE_CHARS,
    UNEXPECTED_ERROR,
};
pub use config::{DEFAULT_MODEL, DEFAULT_PORT, RelayConfig};
pub use generator::{GeminiGenerator, TextGenerator};
pub use rate_limit::{Decision, RateLimiter};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    middleware,
    routing::{get, post},
};
use std::net::SocketAddr;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

const BODY_LIMIT: usize = 1024 * 1024;

fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);
    match allowed_origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(_)) => {
            tracing::warn!("FRONTEND_ORIGIN is not a valid header value; mirroring request origin");
            layer.allow_origin(AllowOrigin::mirror_request())
        }
        None => layer.allow_origin(AllowOrigin::mirror_request()),
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(state.config.allowed_origin.as_deref());
    let static_dir = ServeDir::new(&state.config.static_dir);

    let api = Router::new()
        .route("/api/chat", post(api::chat))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit_requests,
        ));

    Router::new()
        .route("/health", get(api::health))
        .merge(api)
        .fallback_service(static_dir)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: RelayConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let app = router(AppState::from_config(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("relay listening on http://{}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
