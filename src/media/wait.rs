//! Waiting for a downloaded file to settle on disk.

use crate::error::{NoteVidyaError, Result};
use std::path::Path;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, instrument};

/// Wait until `path` exists and its size is unchanged between two checks.
///
/// Checks every `interval`; gives up with [`NoteVidyaError::DownloadTimeout`]
/// once `timeout` has elapsed.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn wait_for_download(path: &Path, interval: Duration, timeout: Duration) -> Result<()> {
    let started = Instant::now();

    while !tokio::fs::try_exists(path).await? {
        if started.elapsed() > timeout {
            return Err(NoteVidyaError::DownloadTimeout(timeout.as_secs()));
        }
        sleep(interval).await;
    }

    let mut last_size = None;
    loop {
        let size = tokio::fs::metadata(path).await?.len();
        if last_size == Some(size) {
            debug!("Download settled at {} bytes", size);
            return Ok(());
        }
        if started.elapsed() > timeout {
            return Err(NoteVidyaError::DownloadTimeout(timeout.as_secs()));
        }
        last_size = Some(size);
        sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(10);

    /// Append `chunk` to `path` every `TICK`, `times` times (or forever).
    fn spawn_writer(
        path: std::path::PathBuf,
        chunk: &'static [u8],
        times: Option<usize>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            use tokio::io::AsyncWriteExt;

            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .await
                .unwrap();
            let mut written = 0;
            while times.map_or(true, |n| written < n) {
                file.write_all(chunk).await.unwrap();
                file.flush().await.unwrap();
                written += 1;
                sleep(TICK).await;
            }
        })
    }

    #[tokio::test]
    async fn test_existing_stable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media.webm");
        std::fs::write(&path, b"0123456789").unwrap();

        wait_for_download(&path, TICK, Duration::from_secs(2)).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_that_appears_later() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media.webm");

        let writer_path = path.clone();
        let writer = tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            tokio::fs::write(&writer_path, b"bytes").await.unwrap();
        });

        wait_for_download(&path, TICK, Duration::from_secs(5)).await.unwrap();
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.webm");

        let err = wait_for_download(&path, TICK, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, NoteVidyaError::DownloadTimeout(_)));
    }

    #[tokio::test]
    async fn test_returns_only_after_growth_stops() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media.webm");
        std::fs::write(&path, b"").unwrap();

        let writer = spawn_writer(path.clone(), b"0123456789", Some(30));

        // Checks are spaced well beyond the writer's tick, so every check
        // sees a new size until the writer is done.
        wait_for_download(&path, Duration::from_millis(100), Duration::from_secs(10))
            .await
            .unwrap();

        assert!(writer.is_finished());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 300);
    }

    #[tokio::test]
    async fn test_file_that_keeps_growing_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media.webm");
        std::fs::write(&path, b"").unwrap();

        let writer = spawn_writer(path.clone(), b"x", None);

        let err = wait_for_download(
            &path,
            Duration::from_millis(100),
            Duration::from_millis(500),
        )
        .await
        .unwrap_err();
        writer.abort();

        assert!(matches!(err, NoteVidyaError::DownloadTimeout(_)));
    }
}
