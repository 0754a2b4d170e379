//! Data models for transcripts.

use serde::{Deserialize, Serialize};

/// A complete transcript with segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Video ID this transcript belongs to.
    pub video_id: String,
    /// Caption language code the segments came from.
    pub language_code: String,
    /// Individual transcript segments with timestamps.
    pub segments: Vec<TranscriptSegment>,
    /// Full transcript text (segments joined by a single space).
    pub full_text: String,
    /// Total duration in seconds.
    pub duration_seconds: f64,
}

impl Transcript {
    /// Create a new transcript from segments.
    pub fn new(video_id: String, language_code: String, segments: Vec<TranscriptSegment>) -> Self {
        let full_text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let duration_seconds = segments
            .iter()
            .map(|s| s.end_seconds())
            .fold(0.0f64, f64::max);

        Self {
            video_id,
            language_code,
            segments,
            full_text,
            duration_seconds,
        }
    }

    /// Whether the transcript carries no spoken text at all.
    pub fn is_empty(&self) -> bool {
        self.full_text.trim().is_empty()
    }

    /// Format the transcript with timestamps for display.
    pub fn format_with_timestamps(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("[{} - {}] {}",
                format_timestamp(s.start),
                format_timestamp(s.end_seconds()),
                s.text
            ))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A single caption line with timing information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Caption text.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// How long the caption is shown, in seconds.
    pub duration: f64,
}

impl TranscriptSegment {
    /// Create a new transcript segment.
    pub fn new(text: String, start: f64, duration: f64) -> Self {
        Self {
            text,
            start,
            duration,
        }
    }

    /// End time in seconds.
    pub fn end_seconds(&self) -> f64 {
        self.start + self.duration
    }
}

/// Format seconds as MM:SS or HH:MM:SS.
pub fn format_timestamp(seconds: f64) -> String {
    let total_seconds = seconds as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_creation() {
        let segments = vec![
            TranscriptSegment::new("Hello world".to_string(), 0.0, 5.0),
            TranscriptSegment::new("This is a test".to_string(), 5.0, 5.0),
        ];

        let transcript = Transcript::new("test_video".to_string(), "en".to_string(), segments);

        assert_eq!(transcript.video_id, "test_video");
        assert_eq!(transcript.full_text, "Hello world This is a test");
        assert_eq!(transcript.duration_seconds, 10.0);
        assert!(!transcript.is_empty());
    }

    #[test]
    fn test_empty_transcript() {
        let transcript = Transcript::new("v".to_string(), "en".to_string(), Vec::new());
        assert!(transcript.is_empty());
        assert_eq!(transcript.duration_seconds, 0.0);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(65.0), "01:05");
        assert_eq!(format_timestamp(3665.0), "01:01:05");
    }

    #[test]
    fn test_format_with_timestamps() {
        let transcript = Transcript::new(
            "v".to_string(),
            "en".to_string(),
            vec![TranscriptSegment::new("Intro".to_string(), 61.0, 4.5)],
        );
        assert_eq!(transcript.format_with_timestamps(), "[01:01 - 01:05] Intro");
    }
}
