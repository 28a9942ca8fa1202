//! Pipeline orchestrator for NoteVidya.
//!
//! Wires settings and credentials into the transcript, notes and chat
//! components, and exposes the operations both front ends call.

use crate::chunking::ChunkingConfig;
use crate::config::{Credentials, Prompts, Settings, TranscriptionProvider};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{NoteVidyaError, Result};
use crate::llm::{ChatModel, OpenAIChatModel};
use crate::media::YtDlpDownloader;
use crate::notes::NotesGenerator;
use crate::openai::create_client_with;
use crate::rag::{ChatPipeline, RagResponse};
use crate::session::ChatSession;
use crate::transcript::{
    Acquisition, LocalTranscription, SupadataClient, Transcript, TranscriptAcquirer,
    TranscriptCache,
};
use crate::transcription::{LocalWhisperTranscriber, OpenAIWhisperTranscriber, Transcriber};
use crate::video::{self, VideoRef};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// The main orchestrator for the NoteVidya pipeline.
pub struct Orchestrator {
    settings: Settings,
    acquirer: TranscriptAcquirer,
    notes: NotesGenerator,
    pipeline: ChatPipeline,
    embedder: Arc<dyn Embedder>,
    chunking: ChunkingConfig,
}

impl Orchestrator {
    /// Build every component from settings and validated credentials.
    pub fn new(settings: Settings, credentials: &Credentials) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let client = create_client_with(
            &credentials.openai_api_key,
            settings.llm.api_base.as_deref(),
            Duration::from_secs(settings.llm.timeout_secs),
        )?;

        let transcriber: Arc<dyn Transcriber> = match settings.transcription.provider {
            TranscriptionProvider::Local => {
                info!("Using local whisper ({})", settings.transcription.model);
                Arc::new(LocalWhisperTranscriber::from_settings(&settings.transcription))
            }
            TranscriptionProvider::OpenAI => {
                info!("Using hosted whisper ({})", settings.transcription.openai_model);
                Arc::new(OpenAIWhisperTranscriber::new(
                    client.clone(),
                    &settings.transcription.openai_model,
                ))
            }
        };

        let local = LocalTranscription::new(
            Arc::new(YtDlpDownloader::from_settings(&settings.download)),
            transcriber,
            settings.temp_dir(),
        )
        .with_wait(
            settings.download.poll_interval(),
            settings.download.timeout(),
        );

        let api = Arc::new(SupadataClient::new(
            &credentials.transcript_api_key,
            &settings.transcript_api,
        )?);

        let cache = TranscriptCache::new(settings.transcripts_dir());
        let acquirer =
            TranscriptAcquirer::new(api, local, cache).with_cache_reuse(settings.cache.reuse);

        let model: Arc<dyn ChatModel> =
            Arc::new(OpenAIChatModel::new(client.clone(), &settings.llm.model));
        let embedder: Arc<dyn Embedder> =
            Arc::new(OpenAIEmbedder::from_settings(client, &settings.embedding));

        Ok(Self::with_components(settings, prompts, acquirer, model, embedder))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        acquirer: TranscriptAcquirer,
        model: Arc<dyn ChatModel>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        let notes =
            NotesGenerator::new(model.clone(), prompts.clone()).with_settings(&settings.notes);
        let pipeline = ChatPipeline::new(model, prompts).with_settings(&settings.rag);
        let chunking = ChunkingConfig::from(&settings.chunking);

        Self {
            settings,
            acquirer,
            notes,
            pipeline,
            embedder,
            chunking,
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validate a user-supplied URL and reduce it to its canonical video reference.
    pub fn resolve_video(&self, url: &str) -> Result<VideoRef> {
        video::normalize(url).ok_or_else(|| NoteVidyaError::InvalidUrl(url.trim().to_string()))
    }

    /// Obtain the transcript for a video (cache, API, then local fallback).
    pub async fn acquire(&self, video: &VideoRef) -> Acquisition {
        self.acquirer.acquire(video).await
    }

    /// Resolve `url` and acquire its transcript.
    #[instrument(skip(self))]
    pub async fn transcript_for(&self, url: &str) -> Result<(VideoRef, Acquisition)> {
        let video = self.resolve_video(url)?;
        let acquisition = self.acquire(&video).await;
        Ok((video, acquisition))
    }

    /// Generate study notes for a transcript.
    pub async fn generate_notes(&self, transcript: &str) -> Result<String> {
        self.notes.generate(transcript).await
    }

    /// Start a chat session over an acquired transcript.
    pub fn new_session(&self, video: VideoRef, transcript: Transcript) -> ChatSession {
        ChatSession::new(video, transcript)
    }

    /// Answer one question in a session, building its index on first use.
    pub async fn ask(&self, session: &mut ChatSession, question: &str) -> Result<RagResponse> {
        session
            .ask(
                &self.pipeline,
                self.embedder.clone(),
                &self.chunking,
                question,
            )
            .await
    }
}
