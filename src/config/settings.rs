//! Configuration settings for NoteVidya.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub transcript_api: TranscriptApiSettings,
    pub download: DownloadSettings,
    pub transcription: TranscriptionSettings,
    pub cache: CacheSettings,
    pub llm: LlmSettings,
    pub notes: NotesSettings,
    pub embedding: EmbeddingSettings,
    pub chunking: ChunkingSettings,
    pub rag: RagSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for temporary media files.
    pub temp_dir: String,
    /// Log level used when neither `RUST_LOG` nor `-v` is given.
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: "/tmp/notevidya".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Remote transcript service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptApiSettings {
    /// Base URL of the transcript service.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TranscriptApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.supadata.ai/v1".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Media download settings for the local fallback path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// yt-dlp format selector.
    pub format: String,
    /// How often to re-check the downloaded file, in milliseconds.
    pub poll_interval_ms: u64,
    /// Give up waiting for the download after this many seconds.
    pub timeout_secs: u64,
    /// Keep going when yt-dlp reports per-item errors.
    pub ignore_errors: bool,
    /// Suppress yt-dlp progress output.
    pub quiet: bool,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            format: "bestaudio/best".to_string(),
            poll_interval_ms: 1000,
            timeout_secs: 100,
            ignore_errors: true,
            quiet: true,
        }
    }
}

impl DownloadSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Speech-to-text provider used by the local fallback.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProvider {
    /// The `whisper` command-line tool running on this machine.
    #[default]
    Local,
    /// OpenAI's hosted Whisper endpoint.
    OpenAI,
}

impl std::str::FromStr for TranscriptionProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "whisper" => Ok(TranscriptionProvider::Local),
            "openai" => Ok(TranscriptionProvider::OpenAI),
            _ => Err(format!("Unknown transcription provider: {}", s)),
        }
    }
}

impl std::fmt::Display for TranscriptionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptionProvider::Local => write!(f, "local"),
            TranscriptionProvider::OpenAI => write!(f, "openai"),
        }
    }
}

/// Speech-to-text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Transcription provider (local, openai).
    pub provider: TranscriptionProvider,
    /// Whisper model size for the local provider.
    pub model: String,
    /// Name or path of the whisper executable.
    pub whisper_binary: String,
    /// Hosted model for the openai provider.
    pub openai_model: String,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            provider: TranscriptionProvider::Local,
            model: "base".to_string(),
            whisper_binary: "whisper".to_string(),
            openai_model: "whisper-1".to_string(),
        }
    }
}

/// Transcript cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Directory holding `<video_id>.txt` transcripts.
    pub transcripts_dir: String,
    /// Serve a cached transcript before calling the remote API.
    pub reuse: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            transcripts_dir: "transcripts".to_string(),
            reuse: true,
        }
    }
}

/// Chat-completion model settings shared by notes and chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat model name.
    pub model: String,
    /// Override for the API base URL (OpenAI-compatible endpoints).
    pub api_base: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_base: None,
            timeout_secs: 300,
        }
    }
}

/// Notes generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NotesSettings {
    /// Output token limit (model default when unset).
    pub max_tokens: Option<u32>,
    /// Sampling temperature (model default when unset).
    pub temperature: Option<f32>,
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
    /// Scale every vector to unit length.
    pub normalize: bool,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            normalize: true,
        }
    }
}

/// Transcript chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared between neighbouring chunks.
    pub chunk_overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// RAG (Retrieval-Augmented Generation) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// Output token limit for answers.
    pub max_tokens: u32,
    /// Sampling temperature for answers.
    pub temperature: f32,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            top_k: 4,
            max_tokens: 500,
            temperature: 0.3,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::NoteVidyaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Directory holding the config and secrets files.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("notevidya")
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }

    /// Get the expanded transcript cache directory.
    pub fn transcripts_dir(&self) -> PathBuf {
        Self::expand_path(&self.cache.transcripts_dir)
    }
}
