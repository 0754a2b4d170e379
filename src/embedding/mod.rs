//! Embedding generation for semantic search and retrieval.

#[cfg(feature = "local-embeddings")]
mod local;
mod openai;

#[cfg(feature = "local-embeddings")]
pub use local::LocalEmbedder;
pub use openai::OpenAIEmbedder;

use crate::config::{EmbeddingProvider, Settings};
use crate::error::{Result, TubechatError};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimensions, if known up front.
    fn dimensions(&self) -> Option<usize>;
}

/// Create the process-wide embedder selected in settings.
///
/// The returned instance is shared by every video pipeline.
pub fn create_embedder(
    settings: &Settings,
    client: Client<OpenAIConfig>,
) -> Result<Arc<dyn Embedder>> {
    match settings.embedding.provider {
        EmbeddingProvider::OpenAI => Ok(Arc::new(OpenAIEmbedder::with_client(
            client,
            &settings.embedding.model,
            settings.embedding.dimensions,
        ))),
        #[cfg(feature = "local-embeddings")]
        EmbeddingProvider::Local => Ok(Arc::new(LocalEmbedder::new(&settings.embedding.local_model)?)),
        #[cfg(not(feature = "local-embeddings"))]
        EmbeddingProvider::Local => Err(TubechatError::Config(
            "embedding.provider = \"local\" needs the local-embeddings feature, which this build leaves out; set provider = \"openai\" or rebuild with default features"
                .to_string(),
        )),
    }
}

/// Check that an embedding service returned one vector per input.
pub(crate) fn ensure_count(expected: usize, embeddings: &[Vec<f32>]) -> Result<()> {
    if embeddings.len() != expected {
        return Err(TubechatError::Embedding(format!(
            "Embedding count mismatch: expected {}, got {}",
            expected,
            embeddings.len()
        )));
    }
    Ok(())
}
