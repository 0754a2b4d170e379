//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{ChatRequest, Orchestrator};
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    video: &str,
    question: &str,
    temperature: Option<f32>,
    context_k: Option<usize>,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'tubechat config show' to inspect the effective settings.");
        return Err(e.into());
    }

    let request = ChatRequest {
        question: question.to_string(),
        video_id: video.to_string(),
        temperature: temperature.unwrap_or(settings.rag.temperature),
        context_k: context_k.unwrap_or(settings.rag.context_k),
    };

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Reading the transcript...");

    match orchestrator.ask(&request).await {
        Ok(reply) => {
            spinner.finish_and_clear();

            println!("\n{}\n", reply.answer);

            if !reply.sources.is_empty() {
                Output::header("Sources");
                for source in &reply.sources {
                    Output::source(source.chunk.order, source.score, &source.chunk.content);
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            if e.is_captions_unavailable() {
                Output::error("This video has no captions, so there is nothing to answer from.");
            } else {
                Output::error(&format!("Failed to generate answer: {}", e));
            }
            return Err(e.into());
        }
    }

    Ok(())
}
