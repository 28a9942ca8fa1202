//! Speech-to-text for downloaded media.
//!
//! # Providers
//!
//! - **Local** (default): runs the `whisper` command-line tool on this machine.
//! - **OpenAI**: uploads the media to the hosted Whisper endpoint.

mod local;
mod whisper;

pub use local::LocalWhisperTranscriber;
pub use whisper::OpenAIWhisperTranscriber;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a media file and return the recognized text.
    async fn transcribe(&self, media_path: &Path) -> Result<String>;

    /// Short name for logs and diagnostics.
    fn name(&self) -> &str;
}
