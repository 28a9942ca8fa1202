//! Local speech-to-text with the `whisper` command-line tool.

use super::Transcriber;
use crate::config::TranscriptionSettings;
use crate::error::{NoteVidyaError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Runs an installed Whisper model over a media file.
pub struct LocalWhisperTranscriber {
    binary: String,
    model: String,
}

impl LocalWhisperTranscriber {
    /// Create a transcriber using the `base` model.
    pub fn new() -> Self {
        Self::with_config("whisper", "base")
    }

    /// Create a transcriber with a specific executable and model size.
    pub fn with_config(binary: &str, model: &str) -> Self {
        Self {
            binary: binary.to_string(),
            model: model.to_string(),
        }
    }

    /// Create a transcriber from the `[transcription]` settings.
    pub fn from_settings(settings: &TranscriptionSettings) -> Self {
        Self::with_config(&settings.whisper_binary, &settings.model)
    }
}

impl Default for LocalWhisperTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for LocalWhisperTranscriber {
    #[instrument(skip(self), fields(media_path = %media_path.display(), model = %self.model))]
    async fn transcribe(&self, media_path: &Path) -> Result<String> {
        let output_dir = tempfile::tempdir()?;

        info!("Running local Whisper ({})", self.model);

        let result = Command::new(&self.binary)
            .arg(media_path)
            .arg("--model")
            .arg(&self.model)
            .arg("--output_format")
            .arg("txt")
            .arg("--output_dir")
            .arg(output_dir.path())
            .arg("--fp16")
            .arg("False")
            .arg("--verbose")
            .arg("False")
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(NoteVidyaError::ToolNotFound(self.binary.clone()));
            }
            Err(e) => {
                return Err(NoteVidyaError::Transcription(format!(
                    "whisper execution failed: {e}"
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NoteVidyaError::Transcription(format!("whisper failed: {}", stderr.trim())));
        }

        let stem = media_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio");
        let text_path = output_dir.path().join(format!("{}.txt", stem));

        let raw = tokio::fs::read_to_string(&text_path).await.map_err(|e| {
            NoteVidyaError::Transcription(format!("whisper wrote no transcript: {e}"))
        })?;

        let text = join_segments(&raw);
        debug!("Recognized {} characters", text.len());
        Ok(text)
    }

    fn name(&self) -> &str {
        "whisper (local)"
    }
}

/// Whisper's txt output holds one segment per line; join them into one blob.
fn join_segments(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
