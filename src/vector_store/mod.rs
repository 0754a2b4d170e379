//! Vector index abstraction for Tubechat.
//!
//! Each video pipeline owns one index over its transcript chunks.

mod memory;

pub use memory::MemoryVectorStore;

use crate::chunking::Chunk;

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched chunk.
    pub chunk: Chunk,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Trait for similarity-searchable chunk indexes.
///
/// Indexes are immutable once built, so searching never needs exclusive access.
pub trait VectorStore: Send + Sync {
    /// Return up to `limit` chunks, most similar first.
    fn search(&self, query_embedding: &[f32], limit: usize) -> Vec<SearchResult>;

    /// Number of indexed chunks.
    fn len(&self) -> usize;

    /// Whether the index holds no chunks.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
