//! Transcript chunking for retrieval.
//!
//! Splits the concatenated transcript text into overlapping, bounded-length
//! chunks that become the units of embedding and retrieval.

mod recursive;

pub use recursive::RecursiveCharacterSplitter;

use serde::{Deserialize, Serialize};

/// A contiguous slice of transcript text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content of this chunk.
    pub content: String,
    /// Position of this chunk in the transcript.
    pub order: usize,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(content: String, order: usize) -> Self {
        Self { content, order }
    }
}

/// Configuration for chunking.
#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    /// Soft maximum chunk length in characters.
    pub chunk_size: usize,
    /// Trailing characters of a chunk repeated at the start of the next one.
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl From<&crate::config::ChunkingSettings> for ChunkingConfig {
    fn from(settings: &crate::config::ChunkingSettings) -> Self {
        Self {
            chunk_size: settings.chunk_size,
            chunk_overlap: settings.chunk_overlap,
        }
    }
}
