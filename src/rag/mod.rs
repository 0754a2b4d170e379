//! RAG (Retrieval-Augmented Generation) for transcript question answering.
//!
//! Retrieval finds the chunks closest to a question, prompt assembly frames them
//! for the model, and generation calls the hosted language model.

pub mod context;
mod response;

pub use context::{assemble_prompt, format_context_for_prompt, ContextBuilder};
pub use response::{OpenAIGenerator, RagEngine, RagResponse};

use crate::error::Result;
use async_trait::async_trait;

/// Trait for text generation backends.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for the prompt.
    ///
    /// The text may be empty if the model declines to answer. Temperature is
    /// passed through unvalidated; the service rejects out-of-range values.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String>;
}
