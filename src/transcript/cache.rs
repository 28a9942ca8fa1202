//! Flat-file transcript cache: one `<video_id>.txt` per video.

use crate::error::Result;
use crate::video::VideoRef;
use std::path::PathBuf;
use tracing::debug;

/// Directory of plain UTF-8 transcripts keyed by video identifier.
#[derive(Debug, Clone)]
pub struct TranscriptCache {
    dir: PathBuf,
}

impl TranscriptCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File a video's transcript is stored in.
    pub fn path_for(&self, video: &VideoRef) -> PathBuf {
        self.dir.join(format!("{}.txt", video.id()))
    }

    /// Read a cached transcript. Missing or blank files count as absent.
    pub async fn load(&self, video: &VideoRef) -> Result<Option<String>> {
        let path = self.path_for(video);
        if !tokio::fs::try_exists(&path).await? {
            return Ok(None);
        }

        let text = tokio::fs::read_to_string(&path).await?;
        if text.trim().is_empty() {
            debug!("Ignoring blank cache file {:?}", path);
            return Ok(None);
        }
        Ok(Some(text))
    }

    /// Write a transcript, replacing any previous copy.
    pub async fn store(&self, video: &VideoRef, text: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(video);
        tokio::fs::write(&path, text).await?;
        debug!("Cached transcript at {:?}", path);
        Ok(path)
    }
}
