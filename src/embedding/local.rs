//! Local sentence-transformer embeddings via FastEmbed.
//!
//! The model is loaded on first use and then stays resident for the lifetime
//! of the embedder, which is shared across every video.

use super::{ensure_count, Embedder};
use crate::error::{Result, TubechatError};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

/// Embedder backed by a locally executed ONNX model.
pub struct LocalEmbedder {
    model_name: String,
    embedding_model: EmbeddingModel,
    dimension: usize,
    model: OnceCell<Arc<TextEmbedding>>,
}

impl LocalEmbedder {
    /// Create an embedder for a supported model name. Nothing is loaded yet.
    pub fn new(model_name: &str) -> Result<Self> {
        let (embedding_model, dimension) = match model_name {
            "all-MiniLM-L6-v2" | "all-minilm-l6-v2" | "sentence-transformers/all-MiniLM-L6-v2" => {
                (EmbeddingModel::AllMiniLML6V2, 384)
            }
            "bge-small-en-v1.5" => (EmbeddingModel::BGESmallENV15, 384),
            "bge-base-en-v1.5" => (EmbeddingModel::BGEBaseENV15, 768),
            _ => {
                return Err(TubechatError::Config(format!(
                    "Unsupported local embedding model: {}. Supported: all-MiniLM-L6-v2, bge-small-en-v1.5, bge-base-en-v1.5",
                    model_name
                )));
            }
        };

        Ok(Self {
            model_name: model_name.to_string(),
            embedding_model,
            dimension,
            model: OnceCell::new(),
        })
    }

    /// Load the model exactly once; concurrent callers wait for the same load.
    async fn model(&self) -> Result<Arc<TextEmbedding>> {
        self.model
            .get_or_try_init(|| async {
                info!("Initializing embedding model: {} ({}D)", self.model_name, self.dimension);

                let options = InitOptions::new(self.embedding_model.clone())
                    .with_show_download_progress(false);
                let model = tokio::task::spawn_blocking(move || TextEmbedding::try_new(options))
                    .await
                    .map_err(|e| TubechatError::Embedding(format!("Model load task failed: {}", e)))?
                    .map_err(|e| TubechatError::Embedding(format!("Model initialization failed: {}", e)))?;

                info!("Embedding model loaded");
                Ok::<_, TubechatError>(Arc::new(model))
            })
            .await
            .cloned()
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| TubechatError::Embedding("No embeddings generated".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.model().await?;
        let inputs = texts.to_vec();
        let expected = inputs.len();

        let embeddings = tokio::task::spawn_blocking(move || model.embed(inputs, None))
            .await
            .map_err(|e| TubechatError::Embedding(format!("Embedding task failed: {}", e)))?
            .map_err(|e| TubechatError::Embedding(e.to_string()))?;

        ensure_count(expected, &embeddings)?;
        if let Some(bad) = embeddings.iter().find(|e| e.len() != self.dimension) {
            return Err(TubechatError::Embedding(format!(
                "Dimension mismatch: expected {}, got {}",
                self.dimension,
                bad.len()
            )));
        }

        debug!("Generated {} local embeddings", embeddings.len());
        Ok(embeddings)
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_name_mapping() {
        let embedder = LocalEmbedder::new("sentence-transformers/all-MiniLM-L6-v2").unwrap();
        assert_eq!(embedder.dimensions(), Some(384));
        assert!(!embedder.model.initialized());

        assert!(matches!(
            LocalEmbedder::new("word2vec"),
            Err(TubechatError::Config(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires model download (~90MB) - run with: cargo test -- --ignored
    async fn test_similar_texts_score_higher() {
        let embedder = LocalEmbedder::new("all-MiniLM-L6-v2").unwrap();
        let vectors = embedder
            .embed_batch(&[
                "The cat sat on the mat".to_string(),
                "A kitten rests on a rug".to_string(),
                "Quarterly tax filing deadlines".to_string(),
            ])
            .await
            .unwrap();

        let near = crate::vector_store::cosine_similarity(&vectors[0], &vectors[1]);
        let far = crate::vector_store::cosine_similarity(&vectors[0], &vectors[2]);
        assert!(near > far);
    }
}
