//! HTTP chat API.
//!
//! Serves the browser client: one chat endpoint plus liveness routes.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::TubechatError;
use crate::orchestrator::{ChatRequest, Orchestrator};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

/// Shared application state.
pub struct AppState {
    orchestrator: Orchestrator,
}

impl AppState {
    /// Wrap an orchestrator for the handlers.
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }
}

/// Build the API router with permissive CORS.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings) {
        Output::error(&e.to_string());
        return Err(e.into());
    }
    info!("{} found", settings.llm.api_key_env);

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let orchestrator = Orchestrator::new(settings)?;
    let app = router(Arc::new(AppState::new(orchestrator)));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    Output::header("Tubechat API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Status", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Chat (RAG)", "POST /api/chat");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Debug, Deserialize)]
struct ChatPayload {
    question: String,
    video_id: String,
    #[serde(default)]
    temperature: Option<f32>,
    #[serde(default, rename = "contextK")]
    context_k: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    answer: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: String,
}

/// Maps library errors onto HTTP statuses.
struct ApiError(TubechatError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            TubechatError::CaptionsUnavailable(video_id) => {
                warn!("No captions for {}", video_id);
                (StatusCode::NOT_FOUND, "No captions available".to_string())
            }
            TubechatError::InvalidInput(msg) => {
                warn!("Rejected chat request: {}", msg);
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            other => {
                error!("Chat request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

// === Handlers ===

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "YT ChatBot API Running!" }))
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "cached_videos": state.orchestrator.cache().len(),
    }))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatPayload>,
) -> Result<Json<ChatResponse>, ApiError> {
    let defaults = &state.orchestrator.settings().rag;
    let request = ChatRequest {
        question: payload.question,
        video_id: payload.video_id,
        temperature: payload.temperature.unwrap_or(defaults.temperature),
        context_k: payload.context_k.unwrap_or(defaults.context_k),
    };

    let reply = state.orchestrator.ask(&request).await.map_err(ApiError)?;
    Ok(Json(ChatResponse { answer: reply.answer }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Prompts;
    use crate::embedding::Embedder;
    use crate::rag::Generator;
    use crate::transcript::{Transcript, TranscriptFetcher, TranscriptSegment};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct FakeFetcher;

    #[async_trait]
    impl TranscriptFetcher for FakeFetcher {
        async fn fetch(&self, video_id: &str) -> crate::Result<Transcript> {
            match video_id {
                "no_captions" => Err(TubechatError::CaptionsUnavailable(video_id.to_string())),
                "broken" => Err(TubechatError::Fetch("connection reset".to_string())),
                _ => Ok(Transcript::new(
                    video_id.to_string(),
                    "en".to_string(),
                    vec![TranscriptSegment::new("The talk covers async Rust.".to_string(), 0.0, 3.0)],
                )),
            }
        }
    }

    struct FakeEmbedder;

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> crate::Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 1.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> crate::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn dimensions(&self) -> Option<usize> {
            Some(2)
        }
    }

    /// Reports the temperature it was called with.
    struct FakeGenerator;

    #[async_trait]
    impl Generator for FakeGenerator {
        async fn generate(&self, _prompt: &str, temperature: f32) -> crate::Result<String> {
            Ok(format!("answered at {}", temperature))
        }
    }

    async fn spawn_server() -> String {
        let orchestrator = Orchestrator::with_components(
            Settings::default(),
            Prompts::default(),
            Arc::new(FakeFetcher),
            Arc::new(FakeEmbedder),
            Arc::new(FakeGenerator),
        )
        .unwrap();
        let app = router(Arc::new(AppState::new(orchestrator)));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn post_chat(base: &str, body: Value) -> (StatusCode, Value) {
        let response = reqwest::Client::new()
            .post(format!("{}/api/chat", base))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let base = spawn_server().await;

        let root: Value = reqwest::get(format!("{}/", base)).await.unwrap().json().await.unwrap();
        assert_eq!(root, json!({"message": "YT ChatBot API Running!"}));

        let health: Value = reqwest::get(format!("{}/health", base)).await.unwrap().json().await.unwrap();
        assert_eq!(health, json!({"status": "ok", "cached_videos": 0}));
    }

    #[tokio::test]
    async fn test_chat_uses_defaults_and_caches() {
        let base = spawn_server().await;

        let (status, body) =
            post_chat(&base, json!({"question": "What is covered?", "video_id": "abc123"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"answer": "answered at 0.2"}));

        let health: Value = reqwest::get(format!("{}/health", base)).await.unwrap().json().await.unwrap();
        assert_eq!(health["cached_videos"], 1);
    }

    #[tokio::test]
    async fn test_chat_accepts_context_k_and_temperature() {
        let base = spawn_server().await;

        let (status, body) = post_chat(
            &base,
            json!({"question": "Why?", "video_id": "xyz", "temperature": 0.5, "contextK": 2}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "answered at 0.5");
    }

    #[tokio::test]
    async fn test_init_question_returns_confirmation() {
        let base = spawn_server().await;

        let (status, body) =
            post_chat(&base, json!({"question": "analyze_video_init", "video_id": "abc123"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["answer"],
            "Video analysis complete! You can now ask questions about the content."
        );
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let base = spawn_server().await;

        let (status, body) =
            post_chat(&base, json!({"question": "Hi?", "video_id": "no_captions"})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "No captions available"}));

        let (status, body) = post_chat(&base, json!({"question": "Hi?", "video_id": "broken"})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("connection reset"));

        let (status, body) = post_chat(&base, json!({"question": "  ", "video_id": "abc123"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("question"));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let base = spawn_server().await;

        let response = reqwest::Client::new()
            .get(format!("{}/", base))
            .header("Origin", "https://www.youtube.com")
            .send()
            .await
            .unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"].to_str().unwrap(),
            "*"
        );
    }
}
