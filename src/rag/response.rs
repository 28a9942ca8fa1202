//! RAG response generation.

use super::{RetrievalIndex, DEFAULT_TOP_K};
use crate::config::{Prompts, RagSettings};
use crate::error::{NoteVidyaError, Result};
use crate::llm::{ChatModel, GenerationParams};
use crate::vector_store::ScoredChunk;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Answers questions from the chunks of a [`RetrievalIndex`].
pub struct ChatPipeline {
    model: Arc<dyn ChatModel>,
    prompts: Prompts,
    top_k: usize,
    params: GenerationParams,
}

impl ChatPipeline {
    pub fn new(model: Arc<dyn ChatModel>, prompts: Prompts) -> Self {
        Self {
            model,
            prompts,
            top_k: DEFAULT_TOP_K,
            params: GenerationParams::new(Some(500), Some(0.3)),
        }
    }

    pub fn with_settings(mut self, settings: &RagSettings) -> Self {
        self.top_k = settings.top_k.max(1);
        self.params = GenerationParams::new(Some(settings.max_tokens), Some(settings.temperature));
        self
    }

    /// Ask a single question and get a response.
    #[instrument(skip(self, index), fields(question = %question))]
    pub async fn answer(&self, index: &RetrievalIndex, question: &str) -> Result<RagResponse> {
        let question = question.trim();
        if question.is_empty() {
            return Err(NoteVidyaError::InvalidInput("question is empty".to_string()));
        }
        info!("Answering question");

        let sources = index.retrieve(question, self.top_k).await?;
        let prompt = self.build_prompt(question, &sources);

        let answer = self.model.complete(&prompt, &self.params).await?;
        debug!("Generated answer from {} sources", sources.len());

        Ok(RagResponse { answer, sources })
    }

    fn build_prompt(&self, question: &str, sources: &[ScoredChunk]) -> String {
        let context = sources
            .iter()
            .map(|s| s.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), context);

        self.prompts.render_with_custom(&self.prompts.rag.user, &vars)
    }
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone, Serialize)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// Chunks the answer was grounded on, best first.
    pub sources: Vec<ScoredChunk>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::ChunkingConfig;
    use crate::embedding::testing::HashingEmbedder;
    use crate::llm::testing::ScriptedChatModel;

    async fn index(text: &str) -> RetrievalIndex {
        let config = ChunkingConfig {
            chunk_size: 40,
            chunk_overlap: 0,
        };
        RetrievalIndex::build(text, &config, Arc::new(HashingEmbedder::new(128)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_answer_uses_joined_context_and_fixed_params() {
        let index =
            index("Alpha particles are helium nuclei.\n\nBeta decay emits electrons.").await;
        let model = Arc::new(ScriptedChatModel::replying("They are helium nuclei."));
        let pipeline = ChatPipeline::new(model.clone(), Prompts::default());

        let response = pipeline
            .answer(&index, "What are alpha particles?")
            .await
            .unwrap();
        assert_eq!(response.answer, "They are helium nuclei.");
        assert_eq!(response.sources.len(), 2);

        let (prompt, params) = model.calls().remove(0);
        assert!(prompt.starts_with("Use the following context to answer:\n"));
        assert!(prompt.contains("Alpha particles are helium nuclei."));
        assert!(prompt.contains("\n\n"));
        assert!(prompt.ends_with("Question: What are alpha particles?\nAnswer in clear English:"));
        assert_eq!(params, GenerationParams::new(Some(500), Some(0.3)));
    }

    #[tokio::test]
    async fn test_context_joined_with_blank_line() {
        let model = Arc::new(ScriptedChatModel::replying("x"));
        let pipeline = ChatPipeline::new(model, Prompts::default());
        let sources = vec![
            ScoredChunk {
                chunk: crate::chunking::Chunk {
                    order: 0,
                    text: "first".to_string(),
                },
                score: 0.9,
            },
            ScoredChunk {
                chunk: crate::chunking::Chunk {
                    order: 1,
                    text: "second".to_string(),
                },
                score: 0.5,
            },
        ];

        let prompt = pipeline.build_prompt("q", &sources);
        assert_eq!(
            prompt,
            "Use the following context to answer:\nfirst\n\nsecond\n\nQuestion: q\nAnswer in clear English:"
        );
    }

    #[tokio::test]
    async fn test_empty_question_is_rejected() {
        let index = index("Some lecture text.").await;
        let model = Arc::new(ScriptedChatModel::replying("unused"));
        let pipeline = ChatPipeline::new(model.clone(), Prompts::default());

        let err = pipeline.answer(&index, "   ").await.unwrap_err();
        assert!(err.is_input_error());
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_settings_override_params() {
        let index = index("Some lecture text.").await;
        let model = Arc::new(ScriptedChatModel::replying("ok"));
        let settings = RagSettings {
            top_k: 2,
            max_tokens: 256,
            temperature: 0.0,
        };
        let pipeline =
            ChatPipeline::new(model.clone(), Prompts::default()).with_settings(&settings);

        pipeline.answer(&index, "anything").await.unwrap();
        assert_eq!(model.calls()[0].1, GenerationParams::new(Some(256), Some(0.0)));
    }
}
