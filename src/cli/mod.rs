//! CLI module for NoteVidya.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// NoteVidya - study notes and Q&A for YouTube lectures
///
/// Fetches (or locally transcribes) a lecture's transcript, turns it into
/// structured notes and answers questions grounded in what was said.
#[derive(Parser, Debug)]
#[command(name = "notevidya")]
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

impl Cli {
    /// Log level from `-v`, or `configured` when no flag was given.
    pub fn log_level<'a>(&self, configured: &'a str) -> &'a str {
        match self.verbose {
            0 => configured,
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the transcript of a video
    Transcript {
        /// YouTube video URL
        url: String,

        /// Write the transcript to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate study notes for a video
    Notes {
        /// YouTube video URL
        url: String,

        /// Write the notes to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Ask a single question about a video
    Ask {
        /// YouTube video URL
        url: String,

        /// The question to ask
        question: String,
    },

    /// Start an interactive chat about a video
    Chat {
        /// YouTube video URL
        url: String,
    },

    /// Start HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Sessions kept in memory; the oldest is dropped beyond this
        #[arg(long, default_value = "100")]
        max_sessions: usize,
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

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
