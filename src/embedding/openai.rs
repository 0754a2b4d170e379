//! Hosted embeddings through the OpenAI-compatible API.

use super::{ensure_count, Embedder};
use crate::error::{Result, TubechatError};
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Maximum number of inputs per embedding request.
const BATCH_SIZE: usize = 100;

/// OpenAI-compatible embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: Option<u32>,
}

impl OpenAIEmbedder {
    /// Create an embedder on an existing client.
    pub fn with_client(
        client: async_openai::Client<async_openai::config::OpenAIConfig>,
        model: &str,
        dimensions: Option<u32>,
    ) -> Self {
        Self {
            client,
            model: model.to_string(),
            dimensions,
        }
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| TubechatError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(BATCH_SIZE) {
            let mut args = CreateEmbeddingRequestArgs::default();
            args.model(&self.model)
                .input(EmbeddingInput::StringArray(chunk.to_vec()));
            if let Some(dimensions) = self.dimensions {
                args.dimensions(dimensions);
            }
            let request = args
                .build()
                .map_err(|e| TubechatError::Embedding(format!("Failed to build request: {}", e)))?;

            let response = self.client.embeddings().create(request).await.map_err(|e| {
                TubechatError::Embedding(format!("Embedding API error: {}", e))
            })?;

            // Sort by index to ensure correct order
            let mut embeddings: Vec<_> = response.data.into_iter().collect();
            embeddings.sort_by_key(|e| e.index);

            let vectors: Vec<Vec<f32>> = embeddings.into_iter().map(|e| e.embedding).collect();
            ensure_count(chunk.len(), &vectors)?;
            all_embeddings.extend(vectors);
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions.map(|d| d as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::create_client_with_timeout;
    use axum::{routing::post, Json, Router};
    use std::time::Duration;

    /// Fake embeddings endpoint: vector is [len, index], returned in reverse order.
    async fn embeddings(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
        let inputs: Vec<String> = body["input"]
            .as_array()
            .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default();

        let data: Vec<serde_json::Value> = inputs
            .iter()
            .enumerate()
            .rev()
            .map(|(i, text)| {
                serde_json::json!({
                    "object": "embedding",
                    "index": i,
                    "embedding": [text.len() as f32, i as f32],
                })
            })
            .collect();

        Json(serde_json::json!({
            "object": "list",
            "model": "fake-embedding",
            "data": data,
            "usage": {"prompt_tokens": 1, "total_tokens": 1},
        }))
    }

    async fn spawn_fake_api() -> String {
        let app = Router::new().route("/v1/embeddings", post(embeddings));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1/", addr)
    }

    #[test]
    fn test_embedder_dimensions() {
        let client = create_client_with_timeout("http://localhost/v1", "key", Duration::from_secs(1)).unwrap();
        let embedder = OpenAIEmbedder::with_client(client.clone(), "text-embedding-004", None);
        assert_eq!(embedder.dimensions(), None);

        let embedder = OpenAIEmbedder::with_client(client, "text-embedding-3-small", Some(256));
        assert_eq!(embedder.dimensions(), Some(256));
    }

    #[tokio::test]
    async fn test_embed_batch_restores_input_order() {
        let base = spawn_fake_api().await;
        let client = create_client_with_timeout(&base, "test-key", Duration::from_secs(5)).unwrap();
        let embedder = OpenAIEmbedder::with_client(client, "fake-embedding", None);

        let texts = vec!["a".to_string(), "bbb".to_string(), "cc".to_string()];
        let vectors = embedder.embed_batch(&texts).await.unwrap();

        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![3.0, 1.0], vec![2.0, 2.0]]);
        assert!(embedder.embed_batch(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_api_is_embedding_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            create_client_with_timeout(&format!("http://{}/v1", addr), "k", Duration::from_secs(5)).unwrap();
        let embedder = OpenAIEmbedder::with_client(client, "fake-embedding", None);
        let err = embedder.embed("hello").await.unwrap_err();
        assert!(matches!(err, TubechatError::Embedding(_)));
    }
}
