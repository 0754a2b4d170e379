//! Transcript acquisition.
//!
//! Fetches time-coded captions for a video from an external transcript service.

mod models;
mod youtube;

pub use models::{format_timestamp, Transcript, TranscriptSegment};
pub use youtube::{normalize_video_id, YoutubeTranscriptFetcher};

use crate::error::Result;
use async_trait::async_trait;

/// Trait for transcript sources.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// Fetch the ordered caption segments for a video.
    ///
    /// Fails with `CaptionsUnavailable` when the video has transcripts disabled,
    /// and with `Fetch` for every other failure. Makes a single attempt.
    async fn fetch(&self, video_id: &str) -> Result<Transcript>;
}
