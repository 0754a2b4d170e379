//! Pipeline orchestrator for Tubechat.
//!
//! Coordinates transcript fetch, chunking, indexing and answering, and keeps
//! one built pipeline per video for the lifetime of the process.

use crate::cache::{PipelineCache, PipelineState};
use crate::chunking::{ChunkingConfig, RecursiveCharacterSplitter};
use crate::config::{Prompts, Settings};
use crate::embedding::{create_embedder, Embedder};
use crate::error::{Result, TubechatError};
use crate::openai::create_client;
use crate::pipeline::{build_index, PipelineParams, VideoPipeline};
use crate::rag::{Generator, OpenAIGenerator, RagEngine};
use crate::transcript::{normalize_video_id, TranscriptFetcher, YoutubeTranscriptFetcher};
use crate::vector_store::SearchResult;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Question that only prepares a video's pipeline.
pub const INIT_QUESTION: &str = "analyze_video_init";

/// Reply to [`INIT_QUESTION`] once the pipeline is ready.
pub const INIT_CONFIRMATION: &str =
    "Video analysis complete! You can now ask questions about the content.";

const QUESTION_LOG_CHARS: usize = 50;

/// A question about one video.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// The question, or [`INIT_QUESTION`].
    pub question: String,
    /// Video ID or URL.
    pub video_id: String,
    /// Sampling temperature used if this request builds the pipeline.
    pub temperature: f32,
    /// Chunks retrieved per question if this request builds the pipeline.
    pub context_k: usize,
}

/// Answer to a [`ChatRequest`].
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// Generated answer (or the init confirmation).
    pub answer: String,
    /// Chunks the answer was grounded on. Empty for init requests.
    pub sources: Vec<SearchResult>,
    /// Whether this request built the pipeline.
    pub built: bool,
}

/// The main orchestrator for the Tubechat pipeline.
pub struct Orchestrator {
    settings: Settings,
    fetcher: Arc<dyn TranscriptFetcher>,
    embedder: Arc<dyn Embedder>,
    splitter: RecursiveCharacterSplitter,
    rag: RagEngine,
    cache: PipelineCache,
}

impl Orchestrator {
    /// Create an orchestrator talking to the configured services.
    ///
    /// Fails fast when the API key is missing.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let api_key = settings.api_key()?;
        let client = create_client(&settings.llm, &api_key)?;

        let fetcher: Arc<dyn TranscriptFetcher> =
            Arc::new(YoutubeTranscriptFetcher::new(&settings.transcript)?);
        let embedder = create_embedder(&settings, client.clone())?;
        let generator: Arc<dyn Generator> =
            Arc::new(OpenAIGenerator::with_client(client, &settings.rag.model));

        info!(
            "Using {} embeddings and {} for generation",
            settings.embedding.provider, settings.rag.model
        );

        Self::with_components(settings, prompts, fetcher, embedder, generator)
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        fetcher: Arc<dyn TranscriptFetcher>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Result<Self> {
        let splitter = RecursiveCharacterSplitter::new(ChunkingConfig::from(&settings.chunking))?;
        let rag = RagEngine::new(embedder.clone(), generator).with_prompts(prompts);

        Ok(Self {
            settings,
            fetcher,
            embedder,
            splitter,
            rag,
            cache: PipelineCache::new(),
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the pipeline cache.
    pub fn cache(&self) -> &PipelineCache {
        &self.cache
    }

    /// State of a video's pipeline (accepts IDs or URLs).
    pub fn pipeline_state(&self, video: &str) -> PipelineState {
        self.cache.state(&normalize_video_id(video))
    }

    /// Answer a question, building the video's pipeline on first use.
    ///
    /// The request that builds a pipeline fixes its temperature and contextK;
    /// later requests with other values reuse it unchanged.
    pub async fn ask(&self, request: &ChatRequest) -> Result<ChatReply> {
        let video_id = normalize_video_id(&request.video_id);
        let question: String = request.question.chars().take(QUESTION_LOG_CHARS).collect();
        info!(
            "Question for {}: {:?} (temperature={}, contextK={})",
            video_id, question, request.temperature, request.context_k
        );

        if video_id.is_empty() {
            return Err(TubechatError::InvalidInput("video_id must not be empty".to_string()));
        }
        if request.question.trim().is_empty() {
            return Err(TubechatError::InvalidInput("question must not be empty".to_string()));
        }
        if request.context_k == 0 {
            return Err(TubechatError::InvalidInput("contextK must be at least 1".to_string()));
        }

        let params = PipelineParams {
            temperature: request.temperature,
            context_k: request.context_k,
        };
        let (pipeline, built) = self.prepare(&video_id, params).await?;

        if request.question == INIT_QUESTION {
            info!("Pipeline for {} is ready", video_id);
            return Ok(ChatReply {
                answer: INIT_CONFIRMATION.to_string(),
                sources: Vec::new(),
                built,
            });
        }

        if pipeline.params != params {
            debug!(
                "Ignoring temperature={} contextK={} for {}; pipeline keeps temperature={} contextK={}",
                params.temperature,
                params.context_k,
                video_id,
                pipeline.params.temperature,
                pipeline.params.context_k
            );
        }

        let response = self.rag.ask(&pipeline, &request.question).await?;

        Ok(ChatReply {
            answer: response.answer,
            sources: response.sources,
            built,
        })
    }

    /// Return the ready pipeline for a video, building it if needed.
    pub async fn prepare(
        &self,
        video_id: &str,
        params: PipelineParams,
    ) -> Result<(Arc<VideoPipeline>, bool)> {
        let (pipeline, built) = self
            .cache
            .get_or_build(video_id, || self.build_pipeline(video_id, params))
            .await?;

        if !built {
            debug!("Reusing pipeline for {} ({} chunks)", video_id, pipeline.chunk_count);
        }
        Ok((pipeline, built))
    }

    /// Fetch, chunk and index a video's transcript.
    #[instrument(skip(self, params))]
    async fn build_pipeline(&self, video_id: &str, params: PipelineParams) -> Result<VideoPipeline> {
        info!("Building pipeline for {}", video_id);

        let transcript = self.fetcher.fetch(video_id).await?;
        info!(
            "Transcript has {} segments ({} chars)",
            transcript.segments.len(),
            transcript.full_text.chars().count()
        );

        let chunks = self.splitter.split(&transcript.full_text);
        info!("Split transcript into {} chunks", chunks.len());

        let store = build_index(self.embedder.as_ref(), chunks).await?;

        Ok(VideoPipeline::new(video_id.to_string(), Arc::new(store), params))
    }
}
