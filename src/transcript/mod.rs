//! Transcript acquisition.
//!
//! A transcript comes from exactly one place per request: the flat-file cache,
//! the remote transcript service, or (when the service fails) a local download
//! followed by speech-to-text. The outcome is returned as a value that records
//! every state the acquisition passed through.

mod acquirer;
mod api;
mod cache;

pub use acquirer::{LocalTranscription, TranscriptAcquirer};
pub use api::SupadataClient;
pub use cache::TranscriptCache;

use crate::error::{NoteVidyaError, Result};
use crate::video::VideoRef;
use async_trait::async_trait;
use serde::Serialize;

/// Trait for remote transcript services.
#[async_trait]
pub trait TranscriptApi: Send + Sync {
    /// Fetch the plain-text transcript of a video.
    async fn fetch_transcript(&self, video_id: &str) -> Result<String>;
}

/// Where a transcript came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptSource {
    Cache,
    Api,
    Local,
}

impl std::fmt::Display for TranscriptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptSource::Cache => write!(f, "cache"),
            TranscriptSource::Api => write!(f, "api"),
            TranscriptSource::Local => write!(f, "local"),
        }
    }
}

/// Transcript text for one video.
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub video_id: String,
    pub text: String,
    pub source: TranscriptSource,
}

impl Transcript {
    pub fn new(video: &VideoRef, text: String, source: TranscriptSource) -> Self {
        Self {
            video_id: video.id().to_string(),
            text,
            source,
        }
    }
}

/// States of the cache -> API -> local fallback machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionState {
    NotStarted,
    CacheHit,
    ApiAttempted,
    LocalAttempted,
    Done,
    Failed,
}

/// Why no transcript could be produced.
#[derive(Debug, Clone, thiserror::Error)]
#[error("both methods failed (API: {api_error}; local: {local_error})")]
pub struct AcquisitionFailure {
    pub api_error: String,
    pub local_error: String,
}

/// Terminal result of an acquisition.
#[derive(Debug, Clone)]
pub enum AcquisitionOutcome {
    Done(Transcript),
    Failed(AcquisitionFailure),
}

/// Everything an acquisition produced: the outcome, the states it went
/// through and any user-facing warnings (such as the API fallback reason).
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub outcome: AcquisitionOutcome,
    pub trail: Vec<AcquisitionState>,
    pub warnings: Vec<String>,
}

impl Acquisition {
    /// Final state.
    pub fn state(&self) -> AcquisitionState {
        self.trail
            .last()
            .copied()
            .unwrap_or(AcquisitionState::NotStarted)
    }

    pub fn transcript(&self) -> Option<&Transcript> {
        match &self.outcome {
            AcquisitionOutcome::Done(t) => Some(t),
            AcquisitionOutcome::Failed(_) => None,
        }
    }

    /// Whether the acquisition passed through `state`.
    pub fn visited(&self, state: AcquisitionState) -> bool {
        self.trail.contains(&state)
    }

    /// Convert into a `Result` for callers that propagate with `?`.
    pub fn into_result(self) -> Result<Transcript> {
        match self.outcome {
            AcquisitionOutcome::Done(t) => Ok(t),
            AcquisitionOutcome::Failed(f) => {
                Err(NoteVidyaError::TranscriptUnavailable(f.to_string()))
            }
        }
    }
}
