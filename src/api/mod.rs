//! Sahacara REST API
//!
//! HTTP API layer for Sahacara, built with Axum.
//!
//! # Endpoints
//!
//! ## Chat
//! - `POST /api/chat` - Analyze health metrics and relay a message upstream
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! All origins are allowed (CORS), every response carries an
//! `x-request-id` header, and handler panics become a generic 500.
//!
//! # Example
//!
//! ```rust,ignore
//! use sahacara::api::{serve, AppState};
//! use sahacara::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!     let server = config.server.clone();
//!
//!     let state = AppState::from_config(config)?;
//!     serve(state, &server).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.server.max_body_bytes;

    let api_routes = Router::new()
        .route("/chat", post(routes::chat::chat))
        .layer(DefaultBodyLimit::max(max_body_bytes));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CatchPanicLayer::custom(handle_panic));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .layer(middleware)
        // Outermost, so it wraps axum's own body type
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Turn a handler panic into the generic internal error body
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}

/// Start the API server
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Sahacara API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Sahacara API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::relay::{Relay, RelayError, RelayResult, TextGenerator};
    use async_trait::async_trait;
    use axum::http::{header, StatusCode};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::util::ServiceExt;

    /// Generator with a canned outcome
    enum Stub {
        Reply(&'static str),
        Fail(fn() -> RelayError),
        Panic,
    }

    struct StubGenerator {
        outcome: Stub,
        configured: bool,
        calls: AtomicUsize,
        last_question: std::sync::Mutex<Option<String>>,
    }

    impl StubGenerator {
        fn new(outcome: Stub) -> Self {
            Self {
                outcome,
                configured: true,
                calls: AtomicUsize::new(0),
                last_question: std::sync::Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        fn name(&self) -> &str {
            "stub-model"
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn generate(&self, _prompt: &str, question: &str) -> RelayResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_question.lock().unwrap() = Some(question.to_string());
            match &self.outcome {
                Stub::Reply(text) => Ok(text.to_string()),
                Stub::Fail(make) => Err(make()),
                Stub::Panic => panic!("generator exploded"),
            }
        }
    }

    fn create_test_app(generator: Arc<StubGenerator>) -> Router {
        let state = AppState::new(Config::default(), Relay::new(generator));
        build_router(state)
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app(Arc::new(StubGenerator::new(Stub::Reply("ok"))));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/live")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready_without_credential() {
        let mut generator = StubGenerator::new(Stub::Reply("ok"));
        generator.configured = false;
        let app = create_test_app(Arc::new(generator));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = create_test_app(Arc::new(StubGenerator::new(Stub::Reply("ok"))));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["upstream_configured"], true);
        assert_eq!(body["model"], "stub-model");
    }

    #[tokio::test]
    async fn test_chat_full_metrics() {
        let generator = Arc::new(StubGenerator::new(Stub::Reply("Drink more water!")));
        let app = create_test_app(Arc::clone(&generator));

        let response = app
            .oneshot(chat_request(
                r#"{"message": "hi", "healthContext": {"calories": 2500, "calorieGoal": 2000, "moodRating": 2, "waterIntake": 3, "waterGoal": 8}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let body = body_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "Drink more water!");

        let overview = &body["analysis"]["overview"];
        assert_eq!(overview["calories"]["status"], "exceeding");
        assert_eq!(overview["mood"]["status"], "needs_attention");
        assert_eq!(overview["water"]["status"], "needs_attention");

        let recommendations = body["analysis"]["recommendations"].as_array().unwrap();
        assert_eq!(recommendations.len(), 2);
        assert_eq!(recommendations[0]["category"], "hydration");
        assert_eq!(recommendations[1]["category"], "nutrition");

        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(generator.last_question.lock().unwrap().as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn test_chat_empty_message_and_context() {
        let generator = Arc::new(StubGenerator::new(Stub::Reply("Hello!")));
        let app = create_test_app(Arc::clone(&generator));

        let response = app
            .oneshot(chat_request(r#"{"message": "", "healthContext": {}}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;

        let overview = &body["analysis"]["overview"];
        assert_eq!(overview["calories"]["current"], json!(0));
        assert_eq!(overview["calories"]["goal"], json!(2000));
        assert_eq!(overview["calories"]["status"], "on_track");
        assert_eq!(overview["mood"]["status"], "needs_attention");
        assert_eq!(overview["water"]["goal"], json!(8));
        assert_eq!(overview["water"]["status"], "needs_attention");

        let recommendations = body["analysis"]["recommendations"].as_array().unwrap();
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0]["category"], "hydration");

        // Empty message still goes upstream
        assert_eq!(generator.last_question.lock().unwrap().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_chat_missing_fields_entirely() {
        let app = create_test_app(Arc::new(StubGenerator::new(Stub::Reply("Hello!"))));

        let response = app.oneshot(chat_request("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chat_invalid_json() {
        let generator = Arc::new(StubGenerator::new(Stub::Reply("unused")));
        let app = create_test_app(Arc::clone(&generator));

        let response = app.oneshot(chat_request("not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_chat_non_numeric_metric() {
        let app = create_test_app(Arc::new(StubGenerator::new(Stub::Reply("unused"))));

        let response = app
            .oneshot(chat_request(r#"{"message": "hi", "healthContext": {"calories": "many"}}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_missing_content_type() {
        let app = create_test_app(Arc::new(StubGenerator::new(Stub::Reply("unused"))));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chat")
                    .body(Body::from(r#"{"message": "hi"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_upstream_failure() {
        let app = create_test_app(Arc::new(StubGenerator::new(Stub::Fail(|| {
            RelayError::Status {
                status: 503,
                message: "Service Unavailable".to_string(),
            }
        }))));

        let response = app
            .oneshot(chat_request(r#"{"message": "hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": "Upstream API error 503: Service Unavailable" }));
    }

    #[tokio::test]
    async fn test_chat_empty_upstream_reply() {
        let app = create_test_app(Arc::new(StubGenerator::new(Stub::Fail(|| {
            RelayError::EmptyResponse
        }))));

        let response = app
            .oneshot(chat_request(r#"{"message": "hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body.get("status").is_none());
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_chat_handler_panic_is_contained() {
        let app = create_test_app(Arc::new(StubGenerator::new(Stub::Panic)));

        let response = app
            .oneshot(chat_request(r#"{"message": "hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": error::INTERNAL_ERROR_MESSAGE }));
    }

    #[tokio::test]
    async fn test_chat_array_health_context_rejected() {
        let generator = Arc::new(StubGenerator::new(Stub::Reply("unused")));
        let app = create_test_app(Arc::clone(&generator));

        let response = app
            .oneshot(chat_request(r#"{"message": "hi", "healthContext": [3000, 1000, 5, 9]}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_chat_array_body_rejected() {
        let generator = Arc::new(StubGenerator::new(Stub::Reply("unused")));
        let app = create_test_app(Arc::clone(&generator));

        let response = app
            .oneshot(chat_request(r#"["hi", {"calories": 2500}]"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_chat_body_over_limit() {
        let generator = Arc::new(StubGenerator::new(Stub::Reply("unused")));
        let mut config = Config::default();
        config.server.max_body_bytes = 64;
        let app = build_router(AppState::new(config, Relay::new(generator.clone())));

        let body = format!(r#"{{"message": "{}"}}"#, "a".repeat(200));
        let response = app.oneshot(chat_request(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        let error = body["error"].as_str().unwrap();
        assert!(error.starts_with("Invalid request body"));
        assert!(error.contains("length limit exceeded"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_chat_body_under_limit() {
        let mut config = Config::default();
        config.server.max_body_bytes = 64;
        let generator = Arc::new(StubGenerator::new(Stub::Reply("ok")));
        let app = build_router(AppState::new(config, Relay::new(generator)));

        let response = app
            .oneshot(chat_request(r#"{"message": "hi"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let app = create_test_app(Arc::new(StubGenerator::new(Stub::Reply("ok"))));

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/chat")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }

    // Real HTTP client against a local stub upstream.
    mod upstream {
        use super::*;
        use crate::config::UpstreamConfig;
        use axum::extract::State;

        async fn spawn_upstream(status: StatusCode, hits: Arc<AtomicUsize>) -> String {
            let router = Router::new()
                .route(
                    "/v1/generate",
                    post(move |State(hits): State<Arc<AtomicUsize>>| async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        (status, axum::Json(json!({ "text": "upstream says hi" })))
                    }),
                )
                .with_state(hits);

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, router).await.unwrap();
            });
            format!("http://{}/v1/generate", addr)
        }

        fn app_for(endpoint: String, api_key: Option<&str>) -> Router {
            let config = Config {
                upstream: UpstreamConfig {
                    endpoint,
                    api_key: api_key.map(str::to_string),
                    timeout_secs: 5,
                    ..UpstreamConfig::default()
                },
                ..Config::default()
            };
            build_router(AppState::from_config(config).unwrap())
        }

        #[tokio::test]
        async fn test_end_to_end_success() {
            let hits = Arc::new(AtomicUsize::new(0));
            let url = spawn_upstream(StatusCode::OK, Arc::clone(&hits)).await;

            let response = app_for(url, Some("key"))
                .oneshot(chat_request(r#"{"message": "hi", "healthContext": {"waterIntake": 9}}"#))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["message"], "upstream says hi");
            assert_eq!(body["analysis"]["recommendations"], json!([]));
            assert_eq!(hits.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_upstream_503_becomes_500() {
            let hits = Arc::new(AtomicUsize::new(0));
            let url = spawn_upstream(StatusCode::SERVICE_UNAVAILABLE, Arc::clone(&hits)).await;

            let response = app_for(url, Some("key"))
                .oneshot(chat_request(r#"{"message": "hi"}"#))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = body_json(response).await;
            assert!(body["error"].as_str().unwrap().contains("503"));
            assert!(body.get("message").is_none());
            assert_eq!(hits.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_missing_credential_never_reaches_upstream() {
            let hits = Arc::new(AtomicUsize::new(0));
            let url = spawn_upstream(StatusCode::OK, Arc::clone(&hits)).await;

            let response = app_for(url, None)
                .oneshot(chat_request(r#"{"message": "hi"}"#))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = body_json(response).await;
            assert_eq!(body, json!({ "error": "No API key configured" }));
            assert_eq!(hits.load(Ordering::SeqCst), 0);
        }
    }
}
