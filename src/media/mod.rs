//! Media download for the local transcription fallback.
//!
//! Media is fetched with yt-dlp into a temporary directory and waited on until
//! the file on disk stops growing.

mod downloader;
mod wait;

pub use downloader::YtDlpDownloader;
pub use wait::wait_for_download;

use crate::error::Result;
use crate::video::VideoRef;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Trait for anything that can put a video's media on local disk.
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    /// Download the media for `video` into `output_dir` and return the file path.
    async fn download(&self, video: &VideoRef, output_dir: &Path) -> Result<PathBuf>;
}
