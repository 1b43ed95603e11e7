//! CLI module for Study Companion.

pub mod commands;
mod input;
mod output;
pub mod preflight;

pub use input::{resolve_input, Input};
pub use output::Output;

use crate::study::QuizType;
use clap::{Parser, Subcommand};

/// Study Companion - summaries, quizzes and flashcards
///
/// Turns text, PDFs, YouTube videos and voice notes into study material,
/// using a hosted model when one is configured and a local engine otherwise.
#[derive(Parser, Debug)]
#[command(name = "study-companion")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Summarize a document and extract its key points and concepts
    Analyze {
        /// Text file, PDF, YouTube URL/ID, or '-' for stdin
        input: String,

        /// Use only the local engine
        #[arg(long)]
        local: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate quiz questions from a document
    Quiz {
        /// Text file, PDF, YouTube URL/ID, or '-' for stdin
        input: String,

        /// Question types: all, multiple-choice, true-false, open-ended
        #[arg(short = 't', long = "type", default_value = "all")]
        quiz_type: QuizType,

        /// Number of questions (defaults to generation.default_questions)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Use only the local engine
        #[arg(long)]
        local: bool,

        /// Seed for reproducible local generation
        #[arg(long)]
        seed: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate flashcards from a document
    Flashcards {
        /// Text file, PDF, YouTube URL/ID, or '-' for stdin
        input: String,

        /// Number of cards (defaults to generation.default_cards)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Use only the local engine
        #[arg(long)]
        local: bool,

        /// Seed for reproducible local generation
        #[arg(long)]
        seed: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the normalized transcript of a YouTube video
    Transcript {
        /// YouTube URL or video ID
        video: String,
    },

    /// Check system requirements and configuration
    Doctor,

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

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
