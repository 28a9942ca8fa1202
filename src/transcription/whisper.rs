//! OpenAI Whisper transcription implementation.

use super::Transcriber;
use crate::error::{NoteVidyaError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{AudioInput, CreateTranscriptionRequestArgs};
use async_openai::Client;
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, instrument};

/// Hosted Whisper transcriber.
pub struct OpenAIWhisperTranscriber {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIWhisperTranscriber {
    /// Create a transcriber on an existing client.
    pub fn new(client: Client<OpenAIConfig>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Transcriber for OpenAIWhisperTranscriber {
    #[instrument(skip(self), fields(media_path = %media_path.display()))]
    async fn transcribe(&self, media_path: &Path) -> Result<String> {
        debug!("Uploading media to {}", self.model);

        let file_bytes = tokio::fs::read(media_path).await?;

        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(
                media_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.mp3")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model)
            .build()
            .map_err(|e| NoteVidyaError::Transcription(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| NoteVidyaError::OpenAI(format!("Whisper API error: {}", e)))?;

        Ok(response.text.trim().to_string())
    }

    fn name(&self) -> &str {
        &self.model
    }
}
