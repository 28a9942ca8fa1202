//! OpenAI embeddings implementation.

use super::{normalize, Embedder};
use crate::config::EmbeddingSettings;
use crate::error::{NoteVidyaError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_openai::Client;
use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, instrument};

/// Inputs per embeddings request.
const BATCH_SIZE: usize = 100;

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    dimensions: usize,
    normalize: bool,
}

impl OpenAIEmbedder {
    /// Create an embedder with the default model and dimensions.
    pub fn new(client: Client<OpenAIConfig>) -> Self {
        Self::with_config(client, "text-embedding-3-small", 1536)
    }

    /// Create an embedder with a custom model and dimensions.
    pub fn with_config(client: Client<OpenAIConfig>, model: &str, dimensions: usize) -> Self {
        Self {
            client,
            model: model.to_string(),
            dimensions,
            normalize: true,
        }
    }

    pub fn from_settings(client: Client<OpenAIConfig>, settings: &EmbeddingSettings) -> Self {
        Self::with_config(client, &settings.model, settings.dimensions as usize)
            .with_normalize(settings.normalize)
    }

    /// Whether returned vectors are scaled to unit length.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// One embeddings request for at most `BATCH_SIZE` inputs.
    async fn embed_chunk(&self, batch: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(EmbeddingInput::StringArray(batch.to_vec()))
            .dimensions(self.dimensions as u32)
            .build()
            .map_err(|e| NoteVidyaError::Embedding(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| NoteVidyaError::OpenAI(format!("Embedding API error: {}", e)))?;

        if response.data.len() != batch.len() {
            return Err(NoteVidyaError::Embedding(format!(
                "Expected {} embeddings, got {}",
                batch.len(),
                response.data.len()
            )));
        }

        let mut data = response.data;
        data.sort_by_key(|e| e.index);

        Ok(data
            .into_iter()
            .map(|item| {
                let mut embedding = item.embedding;
                if self.normalize {
                    normalize(&mut embedding);
                }
                embedding
            })
            .collect())
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| NoteVidyaError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let batches =
            try_join_all(texts.chunks(BATCH_SIZE).map(|batch| self.embed_chunk(batch))).await?;
        let all_embeddings: Vec<Vec<f32>> = batches.into_iter().flatten().collect();

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
