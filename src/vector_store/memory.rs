//! In-memory vector store implementation.
//!
//! Exact nearest-neighbour search by cosine similarity; transcripts are small
//! enough that a linear scan per question is cheap.

use super::{cosine_similarity, SearchResult, VectorStore};
use crate::chunking::Chunk;
use crate::error::{Result, TubechatError};

/// In-memory vector store over one video's chunks.
#[derive(Debug)]
pub struct MemoryVectorStore {
    entries: Vec<(Chunk, Vec<f32>)>,
    dimensions: usize,
}

impl MemoryVectorStore {
    /// Build a store from chunks and their embeddings (same order).
    pub fn from_embeddings(chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(TubechatError::Embedding(format!(
                "Got {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = embeddings.iter().find(|e| e.len() != dimensions) {
            return Err(TubechatError::Embedding(format!(
                "Dimension mismatch: expected {}, got {}",
                dimensions,
                bad.len()
            )));
        }

        Ok(Self {
            entries: chunks.into_iter().zip(embeddings).collect(),
            dimensions,
        })
    }

    /// Embedding dimensions of the indexed vectors.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

impl VectorStore for MemoryVectorStore {
    fn search(&self, query_embedding: &[f32], limit: usize) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|(chunk, embedding)| SearchResult {
                chunk: chunk.clone(),
                score: cosine_similarity(query_embedding, embedding),
            })
            .collect();

        // Ties keep transcript order so results are deterministic.
        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.chunk.order.cmp(&b.chunk.order))
        });
        results.truncate(limit);

        results
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
