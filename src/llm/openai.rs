//! OpenAI chat completions.

use super::{ChatModel, GenerationParams};
use crate::error::{NoteVidyaError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Chat model backed by the OpenAI chat completions endpoint.
pub struct OpenAIChatModel {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIChatModel {
    pub fn new(client: Client<OpenAIConfig>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    fn build_request(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<CreateChatCompletionRequest> {
        let message: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt.to_string())
            .build()
            .map_err(|e| NoteVidyaError::Llm(e.to_string()))?
            .into();

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(vec![message]);
        if let Some(max_tokens) = params.max_tokens {
            builder.max_completion_tokens(max_tokens);
        }
        if let Some(temperature) = params.temperature {
            builder.temperature(temperature);
        }

        builder.build().map_err(|e| NoteVidyaError::Llm(e.to_string()))
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let request = self.build_request(prompt, params)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| NoteVidyaError::Llm(e.to_string()))?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| NoteVidyaError::Llm("Empty response from model".to_string()))?;

        debug!("Received {} characters", answer.len());
        Ok(answer)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
