//! CLI module for Tubechat.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{format_duration, Output};

use clap::{Parser, Subcommand};

/// Tubechat - Ask questions about YouTube videos
///
/// Fetches a video's captions, indexes them, and answers questions grounded
/// in what was said.
#[derive(Parser, Debug)]
#[command(name = "tubechat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TUBECHAT_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP chat API
    Serve {
        /// Host to bind to [default: server.host]
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to [default: server.port]
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a single question about a video
    Ask {
        /// YouTube URL or video ID
        video: String,

        /// The question to ask
        question: String,

        /// Sampling temperature [default: rag.temperature]
        #[arg(short, long)]
        temperature: Option<f32>,

        /// Number of transcript chunks to use as context [default: rag.context_k]
        #[arg(short = 'k', long)]
        context_k: Option<usize>,
    },

    /// Fetch and print a video's transcript
    Transcript {
        /// YouTube URL or video ID
        video: String,

        /// Prefix each caption line with its time range
        #[arg(short, long)]
        timestamps: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
