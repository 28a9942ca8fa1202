//! The cache -> API -> local fallback machine.

use super::{
    Acquisition, AcquisitionFailure, AcquisitionOutcome, AcquisitionState, Transcript,
    TranscriptApi, TranscriptCache, TranscriptSource,
};
use crate::error::{NoteVidyaError, Result};
use crate::media::{wait_for_download, MediaDownloader};
use crate::transcription::Transcriber;
use crate::video::VideoRef;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Download + speech-to-text, with the downloaded media always removed afterwards.
pub struct LocalTranscription {
    downloader: Arc<dyn MediaDownloader>,
    transcriber: Arc<dyn Transcriber>,
    temp_root: PathBuf,
    poll_interval: Duration,
    timeout: Duration,
}

impl LocalTranscription {
    pub fn new(
        downloader: Arc<dyn MediaDownloader>,
        transcriber: Arc<dyn Transcriber>,
        temp_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            downloader,
            transcriber,
            temp_root: temp_root.into(),
            poll_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(100),
        }
    }

    /// Set how often and how long to wait for the download to settle.
    pub fn with_wait(mut self, poll_interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.timeout = timeout;
        self
    }

    /// Download the video's media and transcribe it.
    #[instrument(skip(self), fields(video_id = %video.id()))]
    pub async fn run(&self, video: &VideoRef) -> Result<String> {
        tokio::fs::create_dir_all(&self.temp_root).await?;
        let workdir = tempfile::Builder::new()
            .prefix("notevidya-")
            .tempdir_in(&self.temp_root)?;

        let media = self.downloader.download(video, workdir.path()).await?;
        let result = self.transcribe_downloaded(&media).await;
        remove_media(&media).await;

        result
    }

    async fn transcribe_downloaded(&self, media: &Path) -> Result<String> {
        wait_for_download(media, self.poll_interval, self.timeout).await?;
        info!("Transcribing with {}", self.transcriber.name());
        self.transcriber.transcribe(media).await
    }
}

async fn remove_media(media: &Path) {
    match tokio::fs::remove_file(media).await {
        Ok(()) => debug!("Removed temporary media {:?}", media),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Temp file cleanup failed for {:?}: {}", media, e),
    }
}

/// Obtains a transcript for a video, preferring the remote service.
pub struct TranscriptAcquirer {
    api: Arc<dyn TranscriptApi>,
    local: LocalTranscription,
    cache: TranscriptCache,
    reuse_cache: bool,
}

impl TranscriptAcquirer {
    pub fn new(
        api: Arc<dyn TranscriptApi>,
        local: LocalTranscription,
        cache: TranscriptCache,
    ) -> Self {
        Self {
            api,
            local,
            cache,
            reuse_cache: true,
        }
    }

    /// Serve cached transcripts before calling the API (on by default).
    pub fn with_cache_reuse(mut self, reuse: bool) -> Self {
        self.reuse_cache = reuse;
        self
    }

    /// Run the acquisition. Never fails outright; a failure is an outcome.
    #[instrument(skip(self), fields(video_id = %video.id()))]
    pub async fn acquire(&self, video: &VideoRef) -> Acquisition {
        let mut trail = vec![AcquisitionState::NotStarted];
        let mut warnings = Vec::new();

        if self.reuse_cache {
            match self.cache.load(video).await {
                Ok(Some(text)) => {
                    info!("Using cached transcript");
                    trail.push(AcquisitionState::CacheHit);
                    return finish(
                        trail,
                        warnings,
                        AcquisitionOutcome::Done(Transcript::new(
                            video,
                            text,
                            TranscriptSource::Cache,
                        )),
                    );
                }
                Ok(None) => {}
                Err(e) => warn!("Ignoring unreadable cached transcript: {}", e),
            }
        }

        let api_error = match self.api.fetch_transcript(video.id()).await {
            Ok(text) if !text.trim().is_empty() => {
                info!("Transcript fetched from API");
                return finish(
                    trail,
                    warnings,
                    AcquisitionOutcome::Done(Transcript::new(video, text, TranscriptSource::Api)),
                );
            }
            Ok(_) => "transcript service returned an empty transcript".to_string(),
            Err(e) => e.to_string(),
        };

        warn!("API fallback: {}", api_error);
        trail.push(AcquisitionState::ApiAttempted);
        warnings.push(format!("API fallback: {}", api_error));

        let local = self.local.run(video).await.and_then(|text| {
            if text.trim().is_empty() {
                Err(NoteVidyaError::Transcription(
                    "speech-to-text produced no text".to_string(),
                ))
            } else {
                Ok(text)
            }
        });
        trail.push(AcquisitionState::LocalAttempted);

        let stored = match local {
            Ok(text) => self.cache.store(video, &text).await.map(|path| (text, path)),
            Err(e) => Err(e),
        };

        let outcome = match stored {
            Ok((text, path)) => {
                info!("Local transcription completed, cached at {:?}", path);
                AcquisitionOutcome::Done(Transcript::new(video, text, TranscriptSource::Local))
            }
            Err(e) => {
                warn!("Local transcription failed: {}", e);
                AcquisitionOutcome::Failed(AcquisitionFailure {
                    api_error,
                    local_error: e.to_string(),
                })
            }
        };

        finish(trail, warnings, outcome)
    }
}

fn finish(
    mut trail: Vec<AcquisitionState>,
    warnings: Vec<String>,
    outcome: AcquisitionOutcome,
) -> Acquisition {
    trail.push(match outcome {
        AcquisitionOutcome::Done(_) => AcquisitionState::Done,
        AcquisitionOutcome::Failed(_) => AcquisitionState::Failed,
    });
    Acquisition {
        outcome,
        trail,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::api::tests::{client_for, spawn_server};
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const TICK: Duration = Duration::from_millis(10);

    struct MockApi {
        response: std::result::Result<String, String>,
        calls: AtomicUsize,
    }

    impl MockApi {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(msg: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Err(msg.to_string()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TranscriptApi for MockApi {
        async fn fetch_transcript(&self, _video_id: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .clone()
                .map_err(NoteVidyaError::TranscriptApi)
        }
    }

    #[derive(Default)]
    struct MockDownloader {
        fail: bool,
        calls: AtomicUsize,
        last_path: Mutex<Option<PathBuf>>,
    }

    #[async_trait]
    impl MediaDownloader for MockDownloader {
        async fn download(&self, video: &VideoRef, output_dir: &Path) -> Result<PathBuf> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(NoteVidyaError::MediaDownload("video unavailable".to_string()));
            }
            let path = output_dir.join(format!("{}.webm", video.id()));
            tokio::fs::write(&path, b"fake media bytes").await?;
            *self.last_path.lock().unwrap() = Some(path.clone());
            Ok(path)
        }
    }

    struct MockTranscriber {
        text: Option<String>,
        calls: AtomicUsize,
    }

    impl MockTranscriber {
        fn new(text: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                text: text.map(str::to_string),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Transcriber for MockTranscriber {
        async fn transcribe(&self, media_path: &Path) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(media_path.exists(), "media must exist while transcribing");
            self.text
                .clone()
                .ok_or_else(|| NoteVidyaError::Transcription("model crashed".to_string()))
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
        downloader: Arc<MockDownloader>,
        transcriber: Arc<MockTranscriber>,
    }

    impl Fixture {
        fn new(download_fails: bool, local_text: Option<&str>) -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
                downloader: Arc::new(MockDownloader {
                    fail: download_fails,
                    ..Default::default()
                }),
                transcriber: MockTranscriber::new(local_text),
            }
        }

        fn cache_dir(&self) -> PathBuf {
            self.dir.path().join("transcripts")
        }

        fn acquirer(&self, api: Arc<dyn TranscriptApi>) -> TranscriptAcquirer {
            let local = LocalTranscription::new(
                self.downloader.clone(),
                self.transcriber.clone(),
                self.dir.path().join("tmp"),
            )
            .with_wait(TICK, Duration::from_secs(2));
            TranscriptAcquirer::new(api, local, TranscriptCache::new(self.cache_dir()))
        }

        fn downloads(&self) -> usize {
            self.downloader.calls.load(Ordering::SeqCst)
        }
    }

    fn video() -> VideoRef {
        VideoRef::from_id("dQw4w9WgXcQ").unwrap()
    }

    #[tokio::test]
    async fn test_api_success_never_downloads() {
        let fx = Fixture::new(false, Some("local text"));
        let api = MockApi::ok("api text");

        let acq = fx.acquirer(api.clone()).acquire(&video()).await;

        assert_eq!(acq.state(), AcquisitionState::Done);
        assert_eq!(acq.trail, vec![AcquisitionState::NotStarted, AcquisitionState::Done]);
        let t = acq.transcript().unwrap();
        assert_eq!(t.text, "api text");
        assert_eq!(t.source, TranscriptSource::Api);
        assert_eq!(fx.downloads(), 0);
        assert!(acq.warnings.is_empty());
        assert!(!fx.cache_dir().join("dQw4w9WgXcQ.txt").exists());
    }

    #[tokio::test]
    async fn test_rate_limited_api_falls_back_to_local() {
        let router = Router::new().route(
            "/youtube/transcript",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
        );
        let base = spawn_server(router).await;
        let fx = Fixture::new(false, Some("recognized speech"));

        let acq = fx.acquirer(Arc::new(client_for(&base))).acquire(&video()).await;

        assert_eq!(
            acq.trail,
            vec![
                AcquisitionState::NotStarted,
                AcquisitionState::ApiAttempted,
                AcquisitionState::LocalAttempted,
                AcquisitionState::Done,
            ]
        );
        let t = acq.transcript().unwrap();
        assert_eq!(t.text, "recognized speech");
        assert_eq!(t.source, TranscriptSource::Local);
        assert_eq!(fx.downloads(), 1);
        assert!(acq.warnings[0].contains("429"));
    }

    #[tokio::test]
    async fn test_local_result_is_cached_verbatim() {
        let fx = Fixture::new(false, Some("Exactly this text.\nWith two lines."));
        let acq = fx.acquirer(MockApi::failing("down")).acquire(&video()).await;

        let text = acq.into_result().unwrap().text;
        let cached = std::fs::read_to_string(fx.cache_dir().join("dQw4w9WgXcQ.txt")).unwrap();
        assert_eq!(cached, text);
    }

    #[tokio::test]
    async fn test_media_removed_after_successful_transcription() {
        let fx = Fixture::new(false, Some("ok"));
        fx.acquirer(MockApi::failing("down")).acquire(&video()).await;

        let media = fx.downloader.last_path.lock().unwrap().clone().unwrap();
        assert!(!media.exists());
    }

    #[tokio::test]
    async fn test_media_removed_when_transcription_fails() {
        let fx = Fixture::new(false, None);
        let acq = fx.acquirer(MockApi::failing("down")).acquire(&video()).await;

        assert_eq!(acq.state(), AcquisitionState::Failed);
        let media = fx.downloader.last_path.lock().unwrap().clone().unwrap();
        assert!(!media.exists());
        assert_eq!(fx.transcriber.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_paths_failing_reports_both_errors() {
        let fx = Fixture::new(true, Some("unused"));
        let acq = fx.acquirer(MockApi::failing("quota exceeded")).acquire(&video()).await;

        match &acq.outcome {
            AcquisitionOutcome::Failed(f) => {
                assert!(f.api_error.contains("quota exceeded"));
                assert!(f.local_error.contains("video unavailable"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(acq.visited(AcquisitionState::LocalAttempted));
        assert_eq!(fx.transcriber.calls.load(Ordering::SeqCst), 0);

        let err = acq.into_result().unwrap_err();
        assert!(matches!(err, NoteVidyaError::TranscriptUnavailable(_)));
    }

    #[tokio::test]
    async fn test_empty_results_are_failures() {
        let fx = Fixture::new(false, Some("   "));
        let acq = fx.acquirer(MockApi::ok("")).acquire(&video()).await;

        assert!(acq.visited(AcquisitionState::ApiAttempted));
        assert_eq!(acq.state(), AcquisitionState::Failed);
        assert_eq!(fx.downloads(), 1);
        assert!(!fx.cache_dir().join("dQw4w9WgXcQ.txt").exists());
    }

    #[tokio::test]
    async fn test_cached_transcript_skips_api_and_download() {
        let fx = Fixture::new(false, Some("local"));
        TranscriptCache::new(fx.cache_dir())
            .store(&video(), "from an earlier run")
            .await
            .unwrap();
        let api = MockApi::ok("api");

        let acq = fx.acquirer(api.clone()).acquire(&video()).await;

        let t = acq.transcript().unwrap();
        assert_eq!(t.source, TranscriptSource::Cache);
        assert_eq!(t.text, "from an earlier run");
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.downloads(), 0);
    }

    #[tokio::test]
    async fn test_cache_reuse_can_be_disabled() {
        let fx = Fixture::new(false, Some("local"));
        TranscriptCache::new(fx.cache_dir())
            .store(&video(), "stale")
            .await
            .unwrap();
        let api = MockApi::ok("fresh");

        let acq = fx
            .acquirer(api.clone())
            .with_cache_reuse(false)
            .acquire(&video())
            .await;

        assert_eq!(acq.transcript().unwrap().text, "fresh");
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }
}
