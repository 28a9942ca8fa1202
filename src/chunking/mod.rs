//! Transcript chunking for retrieval.
//!
//! Transcripts are split into overlapping, length-bounded chunks with
//! [`RecursiveSplitter`]; each chunk then has its line breaks flattened.

mod recursive;

pub use recursive::{RecursiveSplitter, DEFAULT_SEPARATORS};

use crate::config::ChunkingSettings;
use serde::{Deserialize, Serialize};

/// A chunk of transcript text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of this chunk in the transcript.
    pub order: usize,
    /// Whitespace-normalized text.
    pub text: String,
}

/// Chunk size limits, in characters.
#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl From<&ChunkingSettings> for ChunkingConfig {
    fn from(settings: &ChunkingSettings) -> Self {
        Self {
            chunk_size: settings.chunk_size,
            chunk_overlap: settings.chunk_overlap,
        }
    }
}

/// Split a transcript into ordered chunks.
pub fn chunk_transcript(text: &str, config: &ChunkingConfig) -> Vec<Chunk> {
    RecursiveSplitter::new(config)
        .split(text)
        .into_iter()
        .map(|t| normalize_whitespace(&t))
        .filter(|t| !t.is_empty())
        .enumerate()
        .map(|(order, text)| Chunk { order, text })
        .collect()
}

/// Replace line breaks with spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic lecture-like text with unique words, paragraphs and line breaks.
    fn lecture(words: usize) -> String {
        let mut out = String::new();
        for i in 0..words {
            if i % 400 == 0 && i > 0 {
                out.push_str("\n\n");
            } else if i % 13 == 0 && i > 0 {
                out.push('\n');
            } else if i > 0 {
                out.push(' ');
            }
            out.push_str(&format!("w{}", i));
        }
        out
    }

    /// Undo the overlap: each chunk starts with a word already seen, resume from there.
    fn stitch(chunks: &[Chunk]) -> Vec<String> {
        let mut merged: Vec<String> = Vec::new();
        for chunk in chunks {
            let words: Vec<String> = chunk.text.split_whitespace().map(str::to_string).collect();
            let first = &words[0];
            if let Some(pos) = merged.iter().position(|w| w == first) {
                merged.truncate(pos);
            }
            merged.extend(words);
        }
        merged
    }

    #[test]
    fn test_no_chunk_exceeds_limit() {
        let text = lecture(3000);
        let chunks = chunk_transcript(&text, &ChunkingConfig::default());

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 1000, "chunk {} too long", chunk.order);
        }
    }

    #[test]
    fn test_chunks_reconstruct_transcript() {
        let text = lecture(3000);
        let chunks = chunk_transcript(&text, &ChunkingConfig::default());

        let original: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        assert_eq!(stitch(&chunks), original);
    }

    #[test]
    fn test_neighbours_overlap() {
        let text = lecture(3000);
        let chunks = chunk_transcript(&text, &ChunkingConfig::default());

        let overlapping = chunks.windows(2).filter(|pair| {
            let next_first = pair[1].text.split_whitespace().next().unwrap();
            pair[0].text.split_whitespace().any(|w| w == next_first)
        });
        assert!(overlapping.count() > 0);
    }

    #[test]
    fn test_orders_are_sequential_and_newlines_removed() {
        let chunks = chunk_transcript("one\ntwo\r\nthree", &ChunkingConfig::default());
        assert_eq!(
            chunks,
            vec![Chunk {
                order: 0,
                text: "one two three".to_string()
            }]
        );
    }
}
