//! Media download via yt-dlp.

use super::MediaDownloader;
use crate::config::DownloadSettings;
use crate::error::{NoteVidyaError, Result};
use crate::video::VideoRef;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Downloads a video's media with the `yt-dlp` command-line tool.
pub struct YtDlpDownloader {
    binary: String,
    format: String,
    ignore_errors: bool,
    quiet: bool,
}

impl YtDlpDownloader {
    /// Create a downloader with default options.
    pub fn new() -> Self {
        Self::from_settings(&DownloadSettings::default())
    }

    /// Create a downloader from the `[download]` settings.
    pub fn from_settings(settings: &DownloadSettings) -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            format: settings.format.clone(),
            ignore_errors: settings.ignore_errors,
            quiet: settings.quiet,
        }
    }

    /// Use a different executable (path or name).
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Command-line arguments for one download.
    fn args(&self, url: &str, output_template: &Path) -> Vec<String> {
        let mut args = vec![
            "--format".to_string(),
            self.format.clone(),
            "--no-playlist".to_string(),
            "--output".to_string(),
            output_template.to_string_lossy().to_string(),
        ];
        if self.ignore_errors {
            args.push("--ignore-errors".to_string());
        }
        if self.quiet {
            args.push("--quiet".to_string());
            args.push("--no-warnings".to_string());
        }
        args.push(url.to_string());
        args
    }
}

impl Default for YtDlpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaDownloader for YtDlpDownloader {
    #[instrument(skip(self, output_dir), fields(video_id = %video.id()))]
    async fn download(&self, video: &VideoRef, output_dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(output_dir).await?;

        info!("Downloading media from {}", video.canonical_url());

        let template = output_dir.join(format!("{}.%(ext)s", video.id()));

        let result = Command::new(&self.binary)
            .args(self.args(video.canonical_url(), &template))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(NoteVidyaError::ToolNotFound(self.binary.clone()));
            }
            Err(e) => {
                return Err(NoteVidyaError::MediaDownload(format!(
                    "{} execution failed: {e}",
                    self.binary
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NoteVidyaError::MediaDownload(format!(
                "{} failed: {}",
                self.binary,
                stderr.trim()
            )));
        }

        let path = find_media_file(output_dir, video.id())?;
        debug!("Downloaded to {:?}", path);
        Ok(path)
    }
}

/// Locates a downloaded file by video ID, ignoring yt-dlp's partial files.
pub(crate) fn find_media_file(dir: &Path, video_id: &str) -> Result<PathBuf> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| NoteVidyaError::MediaDownload(format!("Cannot read directory: {e}")))?;

    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(video_id) && !name.ends_with(".part") && !name.ends_with(".ytdl") {
            return Ok(entry.path());
        }
    }

    Err(NoteVidyaError::MediaDownload(
        "Media file not found after download".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_follow_settings() {
        let downloader = YtDlpDownloader::new();
        let args = downloader.args("https://youtu.be/dQw4w9WgXcQ", Path::new("/tmp/x/%(ext)s"));

        assert_eq!(args.last().unwrap(), "https://youtu.be/dQw4w9WgXcQ");
        assert!(args.contains(&"--no-playlist".to_string()));
        assert!(args.contains(&"--ignore-errors".to_string()));
        assert!(args.contains(&"--quiet".to_string()));

        let loud = YtDlpDownloader::from_settings(&DownloadSettings {
            quiet: false,
            ignore_errors: false,
            ..DownloadSettings::default()
        });
        let args = loud.args("u", Path::new("t"));
        assert!(!args.contains(&"--quiet".to_string()));
        assert!(!args.contains(&"--ignore-errors".to_string()));
    }

    #[test]
    fn test_find_media_file_skips_partials() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dQw4w9WgXcQ.webm.part"), b"x").unwrap();
        std::fs::write(dir.path().join("other.webm"), b"x").unwrap();

        assert!(find_media_file(dir.path(), "dQw4w9WgXcQ").is_err());

        std::fs::write(dir.path().join("dQw4w9WgXcQ.webm"), b"x").unwrap();
        let found = find_media_file(dir.path(), "dQw4w9WgXcQ").unwrap();
        assert_eq!(found.file_name().unwrap(), "dQw4w9WgXcQ.webm");
    }

    #[tokio::test]
    async fn test_missing_binary_is_tool_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = YtDlpDownloader::new().with_binary("notevidya-no-such-yt-dlp");
        let video = VideoRef::from_id("dQw4w9WgXcQ").unwrap();

        let err = downloader.download(&video, dir.path()).await.unwrap_err();
        assert!(matches!(err, NoteVidyaError::ToolNotFound(_)));
    }
}
