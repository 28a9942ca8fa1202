//! Configuration module for NoteVidya.
//!
//! Handles loading application settings, prompt templates and API credentials.

mod prompts;
mod secrets;
mod settings;

pub use prompts::{NotesPrompts, Prompts, RagPrompts};
pub use secrets::{Credentials, Secrets, OPENAI_API_KEY_ENV, TRANSCRIPT_API_KEY_ENV};
pub use settings::{
    CacheSettings, ChunkingSettings, DownloadSettings, EmbeddingSettings, GeneralSettings,
    LlmSettings, NotesSettings, PromptSettings, RagSettings, Settings, TranscriptApiSettings,
    TranscriptionProvider, TranscriptionSettings,
};
