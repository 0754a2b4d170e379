//! RAG response generation.

use super::{assemble_prompt, ContextBuilder, Generator};
use crate::config::Prompts;
use crate::embedding::Embedder;
use crate::error::{Result, TubechatError};
use crate::pipeline::VideoPipeline;
use crate::vector_store::SearchResult;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Chat-completion generator on the OpenAI-compatible API.
pub struct OpenAIGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIGenerator {
    /// Create a generator for a model on an existing client.
    pub fn with_client(
        client: async_openai::Client<async_openai::config::OpenAIConfig>,
        model: &str,
    ) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Generator for OpenAIGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| TubechatError::Generation(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(temperature)
            .build()
            .map_err(|e| TubechatError::Generation(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            TubechatError::Generation(format!("Failed to generate response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TubechatError::Generation("Empty response from LLM".to_string()))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

/// Answers questions against a built video pipeline.
pub struct RagEngine {
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    prompts: Prompts,
}

impl RagEngine {
    /// Create a new RAG engine.
    pub fn new(embedder: Arc<dyn Embedder>, generator: Arc<dyn Generator>) -> Self {
        Self {
            embedder,
            generator,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Retrieve, assemble and generate an answer using the pipeline's own parameters.
    #[instrument(skip(self, pipeline), fields(video_id = %pipeline.video_id))]
    pub async fn ask(&self, pipeline: &VideoPipeline, question: &str) -> Result<RagResponse> {
        let params = pipeline.params;

        let sources = ContextBuilder::new(pipeline.store.clone(), self.embedder.clone())
            .with_max_chunks(params.context_k)
            .build(question)
            .await?;
        debug!("Retrieved {} chunks (k={})", sources.len(), params.context_k);

        let prompt = assemble_prompt(&self.prompts, &sources, question);
        let answer = self.generator.generate(&prompt, params.temperature).await?;

        info!("Generated answer ({} chars)", answer.len());

        Ok(RagResponse { answer, sources })
    }
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// Chunks the answer was grounded on, most similar first.
    pub sources: Vec<SearchResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::create_client_with_timeout;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use std::time::Duration;

    async fn completions(Json(body): Json<serde_json::Value>) -> (StatusCode, Json<serde_json::Value>) {
        let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
        if prompt.contains("decline") {
            return (
                StatusCode::OK,
                Json(serde_json::json!({
                    "id": "chatcmpl-2",
                    "object": "chat.completion",
                    "created": 1,
                    "model": body["model"],
                    "choices": [{
                        "index": 0,
                        "message": {"role": "assistant", "content": null},
                        "finish_reason": "content_filter"
                    }]
                })),
            );
        }
        if body["model"] == "missing-model" {
            return (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": {"message": "API key not valid", "type": "invalid_request_error", "param": null, "code": null}
                })),
            );
        }

        let reply = format!(
            "model={} temperature={} prompt_len={}",
            body["model"].as_str().unwrap_or_default(),
            body["temperature"],
            prompt.len()
        );
        (
            StatusCode::OK,
            Json(serde_json::json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "created": 1,
                "model": body["model"],
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": reply},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
            })),
        )
    }

    async fn generator(model: &str) -> OpenAIGenerator {
        let app = Router::new().route("/v1/chat/completions", post(completions));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client =
            create_client_with_timeout(&format!("http://{}/v1/", addr), "test-key", Duration::from_secs(5))
                .unwrap();
        OpenAIGenerator::with_client(client, model)
    }

    #[tokio::test]
    async fn test_generate_sends_model_and_temperature() {
        let generator = generator("gemini-2.0-flash-exp").await;
        let answer = generator.generate("hello", 0.5).await.unwrap();
        assert_eq!(answer, "model=gemini-2.0-flash-exp temperature=0.5 prompt_len=5");
    }

    #[tokio::test]
    async fn test_declined_answer_is_empty() {
        let generator = generator("gemini-2.0-flash-exp").await;
        let answer = generator.generate("please decline", 0.2).await.unwrap();
        assert_eq!(answer, "");
    }

    #[tokio::test]
    async fn test_service_rejection_is_generation_error() {
        let generator = generator("missing-model").await;
        let err = generator.generate("hello", 0.2).await.unwrap_err();
        assert!(matches!(err, TubechatError::Generation(_)));
    }
}
