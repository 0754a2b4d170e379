//! Transcript command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::{format_duration, Output};
use crate::config::Settings;
use crate::transcript::{normalize_video_id, TranscriptFetcher, YoutubeTranscriptFetcher};
use anyhow::Result;

/// Run the transcript command.
pub async fn run_transcript(video: &str, timestamps: bool, settings: Settings) -> Result<()> {
    let video_id = normalize_video_id(video);
    if video_id.is_empty() {
        anyhow::bail!("A video URL or ID is required");
    }

    if let Err(e) = preflight::check(Operation::Transcript, &settings) {
        Output::error(&e.to_string());
        return Err(e.into());
    }

    let fetcher = YoutubeTranscriptFetcher::new(&settings.transcript)?;

    let spinner = Output::spinner("Fetching captions...");
    let result = fetcher.fetch(&video_id).await;
    spinner.finish_and_clear();

    let transcript = match result {
        Ok(transcript) => transcript,
        Err(e) => {
            Output::error(&format!("Failed to fetch transcript: {}", e));
            return Err(e.into());
        }
    };

    Output::header(&format!("Transcript for {}", transcript.video_id));
    Output::kv("Language", &transcript.language_code);
    Output::kv("Segments", &transcript.segments.len().to_string());
    Output::kv("Duration", &format_duration(transcript.duration_seconds));
    println!();

    if transcript.is_empty() {
        Output::info("The caption track contains no text.");
    } else if timestamps {
        println!("{}", transcript.format_with_timestamps());
    } else {
        println!("{}", transcript.full_text);
    }

    Ok(())
}
