//! Chat-completion models.

mod openai;

pub use openai::OpenAIChatModel;

use crate::error::Result;
use async_trait::async_trait;

/// Sampling parameters for a single completion. `None` leaves the provider default.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl GenerationParams {
    pub fn new(max_tokens: Option<u32>, temperature: Option<f32>) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

/// Trait for text generation from a single prompt.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send `prompt` as one user message and return the reply text.
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}
