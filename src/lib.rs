//! NoteVidya - study notes and Q&A for YouTube lectures
//!
//! # Overview
//!
//! NoteVidya takes a YouTube video URL and:
//! - obtains its transcript from a transcript service, falling back to a
//!   local download plus speech-to-text when the service fails
//! - turns the transcript into structured study notes with a chat model
//! - answers questions about the lecture from retrieved transcript chunks
//!
//! # Architecture
//!
//! - `video` - URL validation and canonicalization
//! - `transcript` - Cache, transcript service and the fallback machine
//! - `media` - yt-dlp download and completion wait
//! - `transcription` - Speech-to-text (local whisper or hosted)
//! - `notes` - Study-notes generation
//! - `chunking` - Recursive character splitting
//! - `embedding` - Embedding generation
//! - `vector_store` - Cosine similarity index
//! - `rag` - Retrieval index and answer pipeline
//! - `session` - Chat sessions and history
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use notevidya::config::{Secrets, Settings};
//! use notevidya::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let credentials = Secrets::load()?.require()?;
//!     let orchestrator = Orchestrator::new(settings, &credentials)?;
//!
//!     let (video, acquisition) = orchestrator
//!         .transcript_for("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
//!         .await?;
//!     let transcript = acquisition.into_result()?;
//!     println!("{}", orchestrator.generate_notes(&transcript.text).await?);
//!
//!     let mut session = orchestrator.new_session(video, transcript);
//!     let answer = orchestrator.ask(&mut session, "What is the main idea?").await?;
//!     println!("{}", answer.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod media;
pub mod notes;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod session;
pub mod transcript;
pub mod transcription;
pub mod vector_store;
pub mod video;

pub use error::{NoteVidyaError, Result};
