//! Tubechat - Question answering over YouTube transcripts
//!
//! Fetches a video's captions, indexes them in memory, and answers questions
//! grounded in what was said, using a hosted OpenAI-compatible model.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `transcript` - Caption fetching from the video site
//! - `chunking` - Recursive character splitting of transcript text
//! - `embedding` - Embedding generation
//! - `vector_store` - In-memory similarity index
//! - `rag` - Retrieval, prompt assembly and generation
//! - `pipeline` - Per-video index building
//! - `cache` - Single-flight cache of built pipelines
//! - `orchestrator` - Request handling across all of the above
//!
//! # Example
//!
//! ```rust,no_run
//! use tubechat::config::Settings;
//! use tubechat::orchestrator::{ChatRequest, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let reply = orchestrator
//!         .ask(&ChatRequest {
//!             question: "What is the video about?".to_string(),
//!             video_id: "dQw4w9WgXcQ".to_string(),
//!             temperature: 0.2,
//!             context_k: 4,
//!         })
//!         .await?;
//!     println!("{}", reply.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod pipeline;
pub mod rag;
pub mod transcript;
pub mod vector_store;

pub use error::{Result, TubechatError};
