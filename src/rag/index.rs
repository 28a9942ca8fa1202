//! Chunk + embed + index a transcript.

use crate::chunking::{chunk_transcript, ChunkingConfig};
use crate::embedding::Embedder;
use crate::error::{NoteVidyaError, Result};
use crate::vector_store::{ScoredChunk, SimilarityIndex};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Searchable index over one transcript's chunks.
pub struct RetrievalIndex {
    embedder: Arc<dyn Embedder>,
    index: SimilarityIndex,
}

impl std::fmt::Debug for RetrievalIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalIndex")
            .field("chunks", &self.index.len())
            .finish()
    }
}

impl RetrievalIndex {
    /// Split, embed and index `transcript`.
    #[instrument(skip(transcript, embedder), fields(transcript_len = transcript.len()))]
    pub async fn build(
        transcript: &str,
        config: &ChunkingConfig,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        if transcript.trim().is_empty() {
            return Err(NoteVidyaError::InvalidInput(
                "transcript is empty, nothing to index".to_string(),
            ));
        }

        let chunks = chunk_transcript(transcript, config);
        debug!("Split transcript into {} chunks", chunks.len());

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;
        let index = SimilarityIndex::from_parts(chunks, embeddings)?;

        info!("Indexed {} chunks", index.len());
        Ok(Self { embedder, index })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The `k` chunks most similar to `query`, best first.
    #[instrument(skip(self, query))]
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let query_embedding = self.embedder.embed(query).await?;
        Ok(self.index.search(&query_embedding, k))
    }
}
