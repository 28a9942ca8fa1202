//! Error types for NoteVidya.

use thiserror::Error;

/// Library-level error type for NoteVidya operations.
#[derive(Error, Debug)]
pub enum NoteVidyaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credential: {0}. Add it to secrets.toml or set the matching environment variable.")]
    MissingCredential(String),

    #[error("Not a YouTube video URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transcript API error: {0}")]
    TranscriptApi(String),

    #[error("No transcript available: {0}")]
    TranscriptUnavailable(String),

    #[error("Media download failed: {0}")]
    MediaDownload(String),

    #[error("Timeout: download did not complete within {0} seconds")]
    DownloadTimeout(u64),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Language model error: {0}")]
    Llm(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),
}

impl NoteVidyaError {
    /// Whether the error was caused by what the user typed rather than by a service.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            NoteVidyaError::InvalidUrl(_) | NoteVidyaError::InvalidInput(_)
        )
    }
}

/// Result type alias for NoteVidya operations.
pub type Result<T> = std::result::Result<T, NoteVidyaError>;
