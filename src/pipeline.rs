//! Per-video retrieval pipelines.
//!
//! A pipeline is built once from a transcript and never changes afterwards.

use crate::chunking::Chunk;
use crate::embedding::Embedder;
use crate::error::{Result, TubechatError};
use crate::vector_store::{MemoryVectorStore, VectorStore};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Retrieval and generation parameters fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineParams {
    /// Sampling temperature passed to the generator.
    pub temperature: f32,
    /// Number of chunks retrieved per question.
    pub context_k: usize,
}

/// A fully built pipeline for one video.
pub struct VideoPipeline {
    /// Normalized video ID (also the cache key).
    pub video_id: String,
    /// Similarity index over the transcript chunks.
    pub store: Arc<dyn VectorStore>,
    /// Parameters chosen by the request that built this pipeline.
    pub params: PipelineParams,
    /// Number of indexed chunks.
    pub chunk_count: usize,
}

impl VideoPipeline {
    /// Wrap a built index.
    pub fn new(video_id: String, store: Arc<dyn VectorStore>, params: PipelineParams) -> Self {
        let chunk_count = store.len();
        Self {
            video_id,
            store,
            params,
            chunk_count,
        }
    }
}

impl std::fmt::Debug for VideoPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoPipeline")
            .field("video_id", &self.video_id)
            .field("params", &self.params)
            .field("chunk_count", &self.chunk_count)
            .finish()
    }
}

/// Embed every chunk and build an in-memory similarity index.
///
/// An empty chunk list (empty transcript) is an embedding failure.
#[instrument(skip(embedder, chunks), fields(chunks = chunks.len()))]
pub async fn build_index(embedder: &dyn Embedder, chunks: Vec<Chunk>) -> Result<MemoryVectorStore> {
    if chunks.is_empty() {
        return Err(TubechatError::Embedding(
            "Nothing to embed: transcript produced no chunks".to_string(),
        ));
    }

    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;
    let store = MemoryVectorStore::from_embeddings(chunks, embeddings)?;

    debug!("Indexed {} chunks ({}D)", store.len(), store.dimensions());
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Returns one vector fewer than asked for when any text says "short".
    struct LengthEmbedder;

    #[async_trait]
    impl Embedder for LengthEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 1.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out: Vec<Vec<f32>> = texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect();
            if texts.iter().any(|t| t.contains("short")) {
                out.pop();
            }
            Ok(out)
        }

        fn dimensions(&self) -> Option<usize> {
            Some(2)
        }
    }

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(t.to_string(), i))
            .collect()
    }

    #[tokio::test]
    async fn test_build_index() {
        let store = build_index(&LengthEmbedder, chunks(&["one", "three"])).await.unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.dimensions(), 2);
    }

    #[tokio::test]
    async fn test_empty_transcript_is_embedding_error() {
        let err = build_index(&LengthEmbedder, Vec::new()).await.unwrap_err();
        assert!(matches!(err, TubechatError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_missing_vectors_fail_the_build() {
        let err = build_index(&LengthEmbedder, chunks(&["a", "short"])).await.unwrap_err();
        assert!(matches!(err, TubechatError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_pipeline_counts_chunks() {
        let store = build_index(&LengthEmbedder, chunks(&["a", "b", "c"])).await.unwrap();
        let pipeline = VideoPipeline::new(
            "abc123".to_string(),
            Arc::new(store),
            PipelineParams {
                temperature: 0.2,
                context_k: 4,
            },
        );
        assert_eq!(pipeline.chunk_count, 3);
    }
}
