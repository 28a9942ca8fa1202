//! Embedding generation for retrieval.

mod openai;

pub use openai::OpenAIEmbedder;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;
}

/// Scale a vector to unit length. Zero vectors are left untouched.
pub fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}


#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic bag-of-words embedder: each lowercase word is hashed
    /// into one of `dims` buckets. Identical texts get identical vectors.
    pub struct HashingEmbedder {
        dims: usize,
        batch_calls: AtomicUsize,
    }

    impl HashingEmbedder {
        pub fn new(dims: usize) -> Self {
            Self {
                dims,
                batch_calls: AtomicUsize::new(0),
            }
        }

        pub fn batch_calls(&self) -> usize {
            self.batch_calls.load(Ordering::SeqCst)
        }

        fn vector(&self, text: &str) -> Vec<f32> {
            let mut v = vec![0.0; self.dims];
            for word in text.split_whitespace() {
                let word = word.to_lowercase();
                let bucket = word
                    .bytes()
                    .fold(5381u64, |h, b| h.wrapping_mul(33).wrapping_add(b as u64));
                v[(bucket % self.dims as u64) as usize] += 1.0;
            }
            normalize(&mut v);
            v
        }
    }

    #[async_trait]
    impl Embedder for HashingEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(self.vector(text))
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.batch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|t| self.vector(t)).collect())
        }

        fn dimensions(&self) -> usize {
            self.dims
        }
    }
}
