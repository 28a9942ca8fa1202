//! Pre-flight checks before expensive operations.
//!
//! Credentials are validated before any component is built, so a missing key
//! stops the command before a single request is made.

use crate::cli::Output;
use crate::config::{Credentials, Secrets, Settings, TranscriptionProvider};
use crate::error::{NoteVidyaError, Result};
use crate::orchestrator::Orchestrator;
use std::path::{Path, PathBuf};
use std::process::Command;

/// `secrets.toml` lives next to whichever config file is in use.
pub fn secrets_path(config: Option<&str>) -> PathBuf {
    match config {
        Some(path) => Settings::expand_path(path)
            .parent()
            .map(|dir| dir.join("secrets.toml"))
            .unwrap_or_else(Secrets::default_path),
        None => Secrets::default_path(),
    }
}

/// Load secrets and fail unless every key is present.
pub fn load_credentials(path: &Path) -> Result<Credentials> {
    Secrets::load_from(path)?.require()
}

/// Validate credentials and build the orchestrator, reporting failures to the user.
pub fn orchestrator(settings: Settings, config: Option<&str>) -> Result<Orchestrator> {
    let credentials = match load_credentials(&secrets_path(config)) {
        Ok(c) => c,
        Err(e) => {
            Output::error(&e.to_string());
            Output::info("Run 'notevidya doctor' for detailed diagnostics.");
            return Err(e);
        }
    };

    std::fs::create_dir_all(settings.temp_dir())?;
    Orchestrator::new(settings, &credentials)
}

/// External tools the local transcription fallback needs: (binary, version flag).
pub fn fallback_tools(settings: &Settings) -> Vec<(String, &'static str)> {
    let mut tools = vec![("yt-dlp".to_string(), "--version")];
    if settings.transcription.provider == TranscriptionProvider::Local {
        tools.push((settings.transcription.whisper_binary.clone(), "--help"));
    }
    tools
}

/// Check if an external tool runs. Returns the first line of its output.
pub fn check_tool(name: &str, version_arg: &str) -> Result<String> {
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or("installed")
            .trim()
            .to_string()),
        Ok(_) => Err(NoteVidyaError::ToolFailed(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(NoteVidyaError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(NoteVidyaError::ToolFailed(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_next_to_custom_config() {
        assert_eq!(
            secrets_path(Some("/etc/notevidya/config.toml")),
            PathBuf::from("/etc/notevidya/secrets.toml")
        );
        assert_eq!(secrets_path(None), Secrets::default_path());
    }

    #[test]
    fn test_fallback_tools_follow_provider() {
        let mut settings = Settings::default();
        let names: Vec<String> = fallback_tools(&settings).into_iter().map(|t| t.0).collect();
        assert_eq!(names, vec!["yt-dlp", "whisper"]);

        settings.transcription.provider = TranscriptionProvider::OpenAI;
        assert_eq!(fallback_tools(&settings).len(), 1);
    }

    #[test]
    fn test_missing_tool() {
        let err = check_tool("notevidya-no-such-tool", "--version").unwrap_err();
        assert!(matches!(err, NoteVidyaError::ToolNotFound(_)));
    }
}
