//! In-memory similarity index.
//!
//! Holds every chunk of one transcript; search is a linear cosine scan.

use super::{cosine_similarity, EmbeddedChunk, ScoredChunk};
use crate::chunking::Chunk;
use crate::error::{NoteVidyaError, Result};

/// Chunks and their embeddings, searchable by cosine similarity.
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    entries: Vec<EmbeddedChunk>,
}

impl SimilarityIndex {
    /// Build from chunks and their embeddings, which must line up one to one.
    pub fn from_parts(chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(NoteVidyaError::Embedding(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| EmbeddedChunk { chunk, embedding })
            .collect();
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top `limit` chunks by similarity to `query_embedding`, best first.
    /// Ties keep transcript order.
    pub fn search(&self, query_embedding: &[f32], limit: usize) -> Vec<ScoredChunk> {
        let mut results: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(query_embedding, &entry.embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);
        results
    }
}
