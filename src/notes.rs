//! Study-notes generation from a lecture transcript.

use crate::config::{NotesSettings, Prompts};
use crate::error::{NoteVidyaError, Result};
use crate::llm::{ChatModel, GenerationParams};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Turns a transcript into structured markdown notes with one model call.
pub struct NotesGenerator {
    model: Arc<dyn ChatModel>,
    prompts: Prompts,
    params: GenerationParams,
}

impl NotesGenerator {
    pub fn new(model: Arc<dyn ChatModel>, prompts: Prompts) -> Self {
        Self {
            model,
            prompts,
            params: GenerationParams::default(),
        }
    }

    pub fn with_settings(mut self, settings: &NotesSettings) -> Self {
        self.params = GenerationParams::new(settings.max_tokens, settings.temperature);
        self
    }

    /// The exact prompt sent for `transcript`.
    pub fn prompt_for(&self, transcript: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), transcript.to_string());
        self.prompts.render_with_custom(&self.prompts.notes.user, &vars)
    }

    #[instrument(
        skip(self, transcript),
        fields(model = %self.model.model(), transcript_len = transcript.len())
    )]
    pub async fn generate(&self, transcript: &str) -> Result<String> {
        if transcript.trim().is_empty() {
            return Err(NoteVidyaError::InvalidInput(
                "transcript is empty, nothing to summarize".to_string(),
            ));
        }

        let notes = self
            .model
            .complete(&self.prompt_for(transcript), &self.params)
            .await?;
        info!("Generated notes ({} characters)", notes.len());
        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedChatModel;

    #[tokio::test]
    async fn test_prompt_embeds_transcript_once() {
        let model = Arc::new(ScriptedChatModel::replying("# Notes"));
        let generator = NotesGenerator::new(model.clone(), Prompts::default());

        let notes = generator.generate("entropy always increases").await.unwrap();
        assert_eq!(notes, "# Notes");

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.matches("entropy always increases").count(), 1);
        assert!(!calls[0].0.contains("{{transcript}}"));
        assert_eq!(calls[0].1, GenerationParams::default());
    }

    #[tokio::test]
    async fn test_settings_become_params() {
        let model = Arc::new(ScriptedChatModel::replying("ok"));
        let settings = NotesSettings {
            max_tokens: Some(2048),
            temperature: Some(0.5),
        };
        let generator =
            NotesGenerator::new(model.clone(), Prompts::default()).with_settings(&settings);

        generator.generate("text").await.unwrap();
        assert_eq!(model.calls()[0].1, GenerationParams::new(Some(2048), Some(0.5)));
    }

    #[tokio::test]
    async fn test_empty_transcript_is_rejected_without_call() {
        let model = Arc::new(ScriptedChatModel::replying("unused"));
        let generator = NotesGenerator::new(model.clone(), Prompts::default());

        let err = generator.generate("  \n").await.unwrap_err();
        assert!(err.is_input_error());
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_model_error_surfaces_verbatim() {
        let model = Arc::new(ScriptedChatModel::failing("quota exceeded"));
        let generator = NotesGenerator::new(model, Prompts::default());

        match generator.generate("text").await {
            Err(NoteVidyaError::Llm(msg)) => assert_eq!(msg, "quota exceeded"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
