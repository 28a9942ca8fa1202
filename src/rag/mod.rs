//! Retrieval-augmented question answering over one transcript.
//!
//! A [`RetrievalIndex`] is built once per transcript; [`ChatPipeline`]
//! answers questions against it.

mod index;
mod response;

pub use index::RetrievalIndex;
pub use response::{ChatPipeline, RagResponse};

/// Number of chunks retrieved per question.
pub const DEFAULT_TOP_K: usize = 4;
