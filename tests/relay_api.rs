//! Integration tests for the relay HTTP surface.
//!
//! The upstream model is replaced by a stub so every path is exercised
//! without network access.

use ai_chat::relay::{self, AppState, RelayConfig, TextGenerator};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

struct StubGenerator {
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl StubGenerator {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(|message| anyhow::anyhow!(message))
    }
}

fn app_with(config: RelayConfig, generator: Option<Arc<StubGenerator>>) -> Router {
    let generator = generator.map(|g| g as Arc<dyn TextGenerator>);
    relay::router(AppState::new(config, generator))
}

fn chat_request(body: Value) -> Request<Body> {
    Request::post("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

mod chat_endpoint {
    use super::*;

    #[tokio::test]
    async fn test_reply_is_returned() {
        let generator = StubGenerator::replying("Halo! Ada yang bisa saya bantu?");
        let app = app_with(RelayConfig::default(), Some(generator.clone()));

        let (status, body) = send(app, chat_request(json!({ "message": "Halo" }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "reply": "Halo! Ada yang bisa saya bantu?" }));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected() {
        let generator = StubGenerator::replying("unused");
        let app = app_with(RelayConfig::default(), Some(generator.clone()));

        let (status, body) = send(app, chat_request(json!({ "message": "  \n " }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Pesan tidak boleh kosong." }));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_message_field_is_rejected() {
        let app = app_with(RelayConfig::default(), Some(StubGenerator::replying("unused")));

        let (status, body) = send(app, chat_request(json!({ "text": "Halo" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Pesan tidak boleh kosong.");
    }

    #[tokio::test]
    async fn test_oversized_message_is_rejected() {
        let generator = StubGenerator::replying("unused");
        let app = app_with(RelayConfig::default(), Some(generator.clone()));

        let (status, body) =
            send(app, chat_request(json!({ "message": "a".repeat(501) }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Panjang pesan maksimal 500 karakter." }));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_message_at_limit_is_accepted() {
        let app = app_with(RelayConfig::default(), Some(StubGenerator::replying("ok")));

        let (status, _) = send(app, chat_request(json!({ "message": "a".repeat(500) }))).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_credential_is_a_configuration_error() {
        let app = app_with(RelayConfig::default(), None);

        let (status, body) = send(app, chat_request(json!({ "message": "Test" }))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "Server belum dikonfigurasi GEMINI_API_KEY." })
        );
    }

    #[tokio::test]
    async fn test_validation_runs_before_credential_check() {
        let app = app_with(RelayConfig::default(), None);

        let (status, body) = send(app, chat_request(json!({ "message": "" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Pesan tidak boleh kosong.");
    }

    #[tokio::test]
    async fn test_upstream_failure_surfaces_its_message() {
        let app = app_with(
            RelayConfig::default(),
            Some(StubGenerator::failing("quota exceeded")),
        );

        let (status, body) = send(app, chat_request(json!({ "message": "Halo" }))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "quota exceeded" }));
    }

    #[tokio::test]
    async fn test_empty_upstream_text_uses_placeholder() {
        let app = app_with(RelayConfig::default(), Some(StubGenerator::replying("")));

        let (status, body) = send(app, chat_request(json!({ "message": "Halo" }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "reply": "Maaf, tidak ada respons." }));
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_client_error() {
        let app = app_with(RelayConfig::default(), Some(StubGenerator::replying("unused")));
        let request = Request::post("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from("{\"message\": "))
            .unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn test_body_over_size_limit_is_payload_too_large() {
        let generator = StubGenerator::replying("unused");
        let app = app_with(RelayConfig::default(), Some(generator.clone()));
        let oversized = "a".repeat(2 * 1024 * 1024);

        let (status, body) = send(app, chat_request(json!({ "message": oversized }))).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
        assert_eq!(generator.calls(), 0);
    }
}

mod health_endpoint {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_model_and_time() {
        let config = RelayConfig {
            model: "gemini-test".to_string(),
            ..RelayConfig::default()
        };
        let app = app_with(config, None);
        let request = Request::get("/health").body(Body::empty()).unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["model"], "gemini-test");
        let time = body["time"].as_str().unwrap();
        assert!(time.contains('T'));
        assert!(time.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_health_uses_default_model() {
        let app = app_with(RelayConfig::default(), None);
        let request = Request::get("/health").body(Body::empty()).unwrap();

        let (_, body) = send(app, request).await;

        assert_eq!(body["model"], "gemini-1.5-flash");
    }
}

mod rate_limiting {
    use super::*;

    #[tokio::test]
    async fn test_requests_over_the_limit_get_429() {
        let config = RelayConfig {
            rate_limit_max: 2,
            ..RelayConfig::default()
        };
        let app = app_with(config, Some(StubGenerator::replying("ok")));

        for remaining in ["1", "0"] {
            let response = app
                .clone()
                .oneshot(chat_request(json!({ "message": "Halo" })))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers()["ratelimit-limit"], "2");
            assert_eq!(response.headers()["ratelimit-remaining"], remaining);
        }

        let (status, body) = send(app, chat_request(json!({ "message": "Halo" }))).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "Terlalu banyak permintaan, coba lagi nanti.");
    }

    #[tokio::test]
    async fn test_health_is_not_limited() {
        let config = RelayConfig {
            rate_limit_max: 1,
            ..RelayConfig::default()
        };
        let app = app_with(config, None);

        for _ in 0..3 {
            let request = Request::get("/health").body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert!(response.headers().get("ratelimit-limit").is_none());
        }
    }
}

mod cross_cutting {
    use super::*;

    #[tokio::test]
    async fn test_request_origin_is_mirrored_by_default() {
        let app = app_with(RelayConfig::default(), None);
        let request = Request::get("/health")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn test_configured_origin_is_enforced() {
        let config = RelayConfig {
            allowed_origin: Some("https://chat.example.com".to_string()),
            ..RelayConfig::default()
        };
        let app = app_with(config, None);
        let request = Request::get("/health")
            .header("origin", "http://evil.example.com")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "https://chat.example.com"
        );
    }

    #[tokio::test]
    async fn test_static_assets_are_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>AI Chat</h1>").unwrap();
        let config = RelayConfig {
            static_dir: dir.path().to_string_lossy().into_owned(),
            ..RelayConfig::default()
        };
        let app = app_with(config, None);
        let request = Request::get("/index.html").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"<h1>AI Chat</h1>");
    }
}
