//! API credentials.
//!
//! Keys live in `secrets.toml` next to the config file and can be overridden
//! by environment variables. They are read once at startup.

use crate::error::{NoteVidyaError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the transcript service key.
pub const TRANSCRIPT_API_KEY_ENV: &str = "TRANSCRIPT_API_KEY";
/// Environment variable overriding the OpenAI key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    #[serde(default)]
    api: ApiKeys,
}

#[derive(Debug, Default, Deserialize)]
struct ApiKeys {
    transcript_api_key: Option<String>,
    openai_api_key: Option<String>,
}

/// Credentials as found, possibly incomplete.
#[derive(Clone, Default)]
pub struct Secrets {
    pub transcript_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field(
                "transcript_api_key",
                &self.transcript_api_key.as_ref().map(|_| "***"),
            )
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "***"),
            )
            .finish()
    }
}

/// Credentials that are known to be present.
#[derive(Clone)]
pub struct Credentials {
    pub transcript_api_key: String,
    pub openai_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("transcript_api_key", &"***")
            .field("openai_api_key", &"***")
            .finish()
    }
}

impl Secrets {
    /// Default location of the secrets file.
    pub fn default_path() -> PathBuf {
        super::Settings::config_dir().join("secrets.toml")
    }

    /// Load from the default file and the process environment.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load from a specific file and the process environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::from_sources(path, |name| std::env::var(name).ok())
    }

    /// Merge a secrets file with an environment lookup. Environment wins.
    pub fn from_sources<F>(path: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: SecretsFile = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            SecretsFile::default()
        };

        let pick = |var: &str, from_file: Option<String>| {
            env(var)
                .or(from_file)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            transcript_api_key: pick(TRANSCRIPT_API_KEY_ENV, file.api.transcript_api_key),
            openai_api_key: pick(OPENAI_API_KEY_ENV, file.api.openai_api_key),
        })
    }

    /// Names of the credentials that are absent.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.transcript_api_key.is_none() {
            missing.push(TRANSCRIPT_API_KEY_ENV);
        }
        if self.openai_api_key.is_none() {
            missing.push(OPENAI_API_KEY_ENV);
        }
        missing
    }

    /// Fail unless every credential is present.
    pub fn require(&self) -> Result<Credentials> {
        match (&self.transcript_api_key, &self.openai_api_key) {
            (Some(transcript), Some(openai)) => Ok(Credentials {
                transcript_api_key: transcript.clone(),
                openai_api_key: openai.clone(),
            }),
            _ => Err(NoteVidyaError::MissingCredential(self.missing().join(", "))),
        }
    }
}
