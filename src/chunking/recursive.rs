//! Recursive character splitting.
//!
//! Splits on the coarsest separator present in the text (paragraph, then
//! line, then word, then character), greedily merges the pieces back into
//! chunks of at most `chunk_size` characters, and carries up to
//! `chunk_overlap` characters of trailing pieces into the next chunk. Pieces
//! that are still too long are split again with the finer separators.

use super::ChunkingConfig;
use std::collections::VecDeque;

/// Separators from coarsest to finest. The empty separator splits into characters.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

/// Splits text into overlapping chunks bounded by a character count.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveSplitter {
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            chunk_size: config.chunk_size.max(1),
            chunk_overlap: config.chunk_overlap.min(config.chunk_size.saturating_sub(1)),
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Split `text` into trimmed, non-empty chunks in document order.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_with(text, &self.separators)
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut finer: &[String] = &[];

        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() {
                separator = "";
                break;
            }
            if text.contains(sep.as_str()) {
                separator = sep;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                chunks.extend(self.merge(&pending));
                pending.clear();
            }

            if finer.is_empty() {
                let trimmed = piece.trim();
                if !trimmed.is_empty() {
                    chunks.push(trimmed.to_string());
                }
            } else {
                chunks.extend(self.split_with(piece, finer));
            }
        }

        if !pending.is_empty() {
            chunks.extend(self.merge(&pending));
        }

        chunks
    }

    /// Greedily join small pieces into chunks, keeping an overlap window.
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size && !window.is_empty() {
                push_trimmed(&mut chunks, &window);

                while total > self.chunk_overlap
                    || (total + len > self.chunk_size && total > 0)
                {
                    match window.pop_front() {
                        Some((_, dropped)) => total -= dropped,
                        None => break,
                    }
                }
            }

            window.push_back((piece, len));
            total += len;
        }

        push_trimmed(&mut chunks, &window);
        chunks
    }
}

fn push_trimmed(chunks: &mut Vec<String>, window: &VecDeque<(&str, usize)>) {
    let joined: String = window.iter().map(|(p, _)| *p).collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

/// Split so that each separator stays at the start of the piece that follows it.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut bounds: Vec<usize> = vec![0];
    bounds.extend(text.match_indices(separator).map(|(i, _)| i));
    bounds.push(text.len());

    bounds
        .windows(2)
        .map(|w| &text[w[0]..w[1]])
        .filter(|p| !p.is_empty())
        .collect()
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(size: usize, overlap: usize) -> RecursiveSplitter {
        RecursiveSplitter::new(&ChunkingConfig {
            chunk_size: size,
            chunk_overlap: overlap,
        })
    }

    #[test]
    fn test_split_keeping_separator() {
        assert_eq!(split_keeping_separator("a b c", " "), vec!["a", " b", " c"]);
        assert_eq!(
            split_keeping_separator("\n\nfoo", "\n"),
            vec!["\n", "\nfoo"]
        );
        assert_eq!(split_keeping_separator("hé", ""), vec!["h", "é"]);
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let chunks = splitter(1000, 200).split("  A short lecture.  ");
        assert_eq!(chunks, vec!["A short lecture."]);
    }

    #[test]
    fn test_words_with_overlap() {
        let chunks = splitter(10, 4).split("aa bb cc dd ee ff");
        assert_eq!(chunks, vec!["aa bb cc", "cc dd ee", "ee ff"]);
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let para_a = "alpha ".repeat(20);
        let para_b = "beta ".repeat(20);
        let text = format!("{}\n\n{}", para_a.trim(), para_b.trim());

        let chunks = splitter(150, 20).split(&text);
        assert_eq!(chunks, vec![para_a.trim().to_string(), para_b.trim().to_string()]);
    }

    #[test]
    fn test_unbroken_run_falls_back_to_characters() {
        let text = "x".repeat(25);
        let chunks = splitter(10, 0).split(&text);
        assert_eq!(chunks, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "é".repeat(30);
        for chunk in splitter(10, 2).split(&text) {
            assert!(char_len(&chunk) <= 10);
        }
    }

    #[test]
    fn test_blank_text_has_no_chunks() {
        assert!(splitter(1000, 200).split("").is_empty());
        assert!(splitter(1000, 200).split(" \n\n \n").is_empty());
    }
}
