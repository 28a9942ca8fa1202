//! Chat sessions: one transcript, its retrieval index and the turn history.

use crate::chunking::ChunkingConfig;
use crate::embedding::Embedder;
use crate::error::{NoteVidyaError, Result};
use crate::rag::{ChatPipeline, RagResponse, RetrievalIndex};
use crate::transcript::Transcript;
use crate::video::VideoRef;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Who said a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a session's history.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl ChatTurn {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            at: Utc::now(),
        }
    }
}

/// An append-only conversation about one video.
///
/// The retrieval index is built lazily on the first question and reused for
/// every later one until the transcript is replaced.
pub struct ChatSession {
    id: Uuid,
    video: VideoRef,
    transcript: Transcript,
    index: Option<Arc<RetrievalIndex>>,
    history: Vec<ChatTurn>,
    created_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(video: VideoRef, transcript: Transcript) -> Self {
        Self {
            id: Uuid::new_v4(),
            video,
            transcript,
            index: None,
            history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn video(&self) -> &VideoRef {
        &self.video
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the index for the current transcript has been built.
    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// Replace the transcript. The index is dropped and rebuilt on the next question.
    pub fn set_transcript(&mut self, transcript: Transcript) {
        self.transcript = transcript;
        self.index = None;
    }

    /// The session's index, building it on first use.
    pub async fn index(
        &mut self,
        embedder: Arc<dyn Embedder>,
        config: &ChunkingConfig,
    ) -> Result<Arc<RetrievalIndex>> {
        if let Some(index) = &self.index {
            return Ok(Arc::clone(index));
        }

        debug!("Building retrieval index for session {}", self.id);
        let index = Arc::new(RetrievalIndex::build(&self.transcript.text, config, embedder).await?);
        self.index = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Answer `question`, recording the user turn and then the assistant turn.
    ///
    /// A failed answer leaves the user turn in the history without a reply.
    #[instrument(skip(self, pipeline, embedder, config), fields(session = %self.id))]
    pub async fn ask(
        &mut self,
        pipeline: &ChatPipeline,
        embedder: Arc<dyn Embedder>,
        config: &ChunkingConfig,
        question: &str,
    ) -> Result<RagResponse> {
        let question = question.trim();
        if question.is_empty() {
            return Err(NoteVidyaError::InvalidInput("question is empty".to_string()));
        }

        self.history.push(ChatTurn::new(Role::User, question));

        let index = self.index(embedder, config).await?;
        let response = pipeline.answer(&index, question).await?;

        self.history
            .push(ChatTurn::new(Role::Assistant, response.answer.clone()));
        Ok(response)
    }
}
