//! Context retrieval and prompt assembly.

use crate::config::Prompts;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{SearchResult, VectorStore};
use std::collections::HashMap;
use std::sync::Arc;

/// Retrieves the chunks most relevant to a question from one video's index.
pub struct ContextBuilder {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    max_chunks: usize,
}

impl ContextBuilder {
    /// Create a new context builder.
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            vector_store,
            embedder,
            max_chunks: 4,
        }
    }

    /// Set the maximum number of context chunks.
    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    /// Retrieve up to `max_chunks` chunks, most similar first.
    ///
    /// Asking for more chunks than are indexed returns all of them.
    pub async fn build(&self, query: &str) -> Result<Vec<SearchResult>> {
        debug_assert!(self.max_chunks > 0, "contextK must be at least 1");

        let query_embedding = self.embedder.embed(query).await?;
        Ok(self.vector_store.search(&query_embedding, self.max_chunks))
    }
}

/// Join retrieved chunk contents with blank lines, in retrieval order.
pub fn format_context_for_prompt(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| r.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the generation prompt from retrieved context and the verbatim question.
pub fn assemble_prompt(prompts: &Prompts, results: &[SearchResult], question: &str) -> String {
    let mut vars = HashMap::new();
    vars.insert("context".to_string(), format_context_for_prompt(results));
    vars.insert("question".to_string(), question.to_string());
    prompts.render_with_custom(&prompts.rag.user, &vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::Chunk;
    use crate::vector_store::MemoryVectorStore;
    use async_trait::async_trait;

    /// Embeds by keyword presence: [rust, python, cooking].
    struct KeywordEmbedder;

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let text = text.to_lowercase();
            Ok(["rust", "python", "cooking"]
                .iter()
                .map(|k| if text.contains(k) { 1.0 } else { 0.0 })
                .collect())
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::new();
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> Option<usize> {
            Some(3)
        }
    }

    fn result(content: &str, order: usize) -> SearchResult {
        SearchResult {
            chunk: Chunk::new(content.to_string(), order),
            score: 1.0,
        }
    }

    async fn store(texts: &[&str]) -> Arc<dyn VectorStore> {
        let chunks: Vec<Chunk> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(t.to_string(), i))
            .collect();
        let contents: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = KeywordEmbedder.embed_batch(&contents).await.unwrap();
        Arc::new(MemoryVectorStore::from_embeddings(chunks, embeddings).unwrap())
    }

    #[tokio::test]
    async fn test_build_returns_most_relevant_first() {
        let store = store(&["Cooking pasta", "Rust lifetimes", "Python typing"]).await;
        let builder = ContextBuilder::new(store, Arc::new(KeywordEmbedder)).with_max_chunks(2);

        let results = builder.build("How do Rust lifetimes work?").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "Rust lifetimes");
    }

    #[tokio::test]
    async fn test_build_caps_at_available_chunks() {
        let store = store(&["Rust one", "Rust two"]).await;
        let builder = ContextBuilder::new(store, Arc::new(KeywordEmbedder)).with_max_chunks(10);
        assert_eq!(builder.build("rust").await.unwrap().len(), 2);
    }

    #[test]
    fn test_format_context_joins_with_blank_lines() {
        let results = vec![result("second best", 3), result("best", 0)];
        assert_eq!(format_context_for_prompt(&results), "second best\n\nbest");
    }

    #[test]
    fn test_assemble_prompt() {
        let prompts = Prompts::default();
        let results = vec![result("Borrowing is checked at compile time.", 0)];
        let prompt = assemble_prompt(&prompts, &results, "When is borrowing checked?");

        assert!(prompt.contains("Answer only from the provided transcript context."));
        assert!(prompt.contains("just say you don't know"));
        assert!(prompt.contains("Borrowing is checked at compile time.\nQuestion: When is borrowing checked?"));
        assert!(!prompt.contains("{{"));
    }
}
