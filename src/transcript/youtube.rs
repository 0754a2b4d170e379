//! YouTube caption source.
//!
//! Thin adapter over `yt-transcript-rs`, which tracks YouTube's caption
//! endpoints and track selection.

use super::{Transcript, TranscriptFetcher, TranscriptSegment};
use crate::config::TranscriptSettings;
use crate::error::{Result, TubechatError};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, instrument};
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};

static VIDEO_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    // Matches various YouTube URL formats and bare video IDs
    Regex::new(
        r"(?x)
        (?:
            # Full YouTube URLs
            (?:https?://)?
            (?:www\.|m\.)?
            (?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/)
            ([a-zA-Z0-9_-]{11})
        )
        |
        # Bare video ID (11 characters)
        ^([a-zA-Z0-9_-]{11})$
    ",
    )
    .expect("Invalid regex")
});

/// Normalize a YouTube URL or bare ID to the video ID.
///
/// Input that does not look like a YouTube reference is returned trimmed but
/// otherwise unchanged; the transcript service decides whether it exists.
pub fn normalize_video_id(input: &str) -> String {
    let input = input.trim();
    VIDEO_ID_REGEX
        .captures(input)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| input.to_string())
}

/// Fetches transcripts from YouTube's caption service.
pub struct YoutubeTranscriptFetcher {
    api: YouTubeTranscriptApi,
    languages: Vec<String>,
}

impl YoutubeTranscriptFetcher {
    /// Create a fetcher from transcript settings.
    pub fn new(settings: &TranscriptSettings) -> Result<Self> {
        if settings.languages.is_empty() {
            return Err(TubechatError::Config(
                "transcript.languages must list at least one language".to_string(),
            ));
        }

        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| TubechatError::Fetch(format!("Failed to create transcript client: {}", e)))?;

        Ok(Self {
            api,
            languages: settings.languages.clone(),
        })
    }
}

/// Captions switched off is the one failure retrying cannot fix.
fn map_fetch_error(video_id: &str, err: CouldNotRetrieveTranscript) -> TubechatError {
    match err.reason {
        Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled) => {
            TubechatError::CaptionsUnavailable(video_id.to_string())
        }
        _ => TubechatError::Fetch(err.to_string()),
    }
}

#[async_trait]
impl TranscriptFetcher for YoutubeTranscriptFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, video_id: &str) -> Result<Transcript> {
        info!("Fetching transcript for {}", video_id);

        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();
        let fetched = self
            .api
            .fetch_transcript(video_id, &languages, false)
            .await
            .map_err(|e| map_fetch_error(video_id, e))?;

        debug!(
            "Using {} caption track ({})",
            fetched.language_code,
            if fetched.is_generated { "generated" } else { "manual" }
        );

        let segments: Vec<TranscriptSegment> = fetched
            .snippets
            .into_iter()
            .filter(|s| !s.text.trim().is_empty())
            .map(|s| TranscriptSegment::new(s.text.trim().to_string(), s.start, s.duration))
            .collect();

        info!("Got transcript with {} segments", segments.len());

        Ok(Transcript::new(
            video_id.to_string(),
            fetched.language_code,
            segments,
        ))
    }
}
