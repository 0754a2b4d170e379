//! Pre-flight checks before expensive operations.
//!
//! Validates configuration up front so commands fail before binding a port
//! or starting a spinner.

use crate::chunking::{ChunkingConfig, RecursiveCharacterSplitter};
use crate::config::Settings;
use crate::error::{Result, TubechatError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Serving the chat API requires the API key, caption languages and valid chunking settings.
    Serve,
    /// Asking questions has the same requirements as serving.
    Ask,
    /// Fetching a transcript only needs caption languages.
    Transcript,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    check_languages(settings)?;

    match operation {
        Operation::Serve | Operation::Ask => {
            settings.api_key()?;
            RecursiveCharacterSplitter::new(ChunkingConfig::from(&settings.chunking))?;
        }
        Operation::Transcript => {}
    }
    Ok(())
}

fn check_languages(settings: &Settings) -> Result<()> {
    if settings.transcript.languages.iter().all(|l| l.trim().is_empty()) {
        return Err(TubechatError::Config(
            "transcript.languages must list at least one language code, e.g. [\"en\"]".to_string(),
        ));
    }
    Ok(())
}
