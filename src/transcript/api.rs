//! Remote transcript service client.

use super::TranscriptApi;
use crate::config::TranscriptApiSettings;
use crate::error::{NoteVidyaError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Longest slice of an error body kept in messages.
const MAX_ERROR_BODY: usize = 200;

#[derive(Deserialize)]
struct TranscriptResponse {
    content: String,
}

/// Client for the Supadata YouTube transcript endpoint.
pub struct SupadataClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupadataClient {
    /// Create a client from the `[transcript_api]` settings.
    pub fn new(api_key: &str, settings: &TranscriptApiSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| NoteVidyaError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl TranscriptApi for SupadataClient {
    #[instrument(skip(self))]
    async fn fetch_transcript(&self, video_id: &str) -> Result<String> {
        let url = format!("{}/youtube/transcript", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("videoId", video_id), ("text", "true")])
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| NoteVidyaError::TranscriptApi(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(NoteVidyaError::TranscriptApi(format!(
                "HTTP {}: {}",
                status,
                body.trim()
            )));
        }

        let body: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| {
                NoteVidyaError::TranscriptApi(format!("unexpected response body: {}", e))
            })?;

        debug!("Fetched {} characters", body.content.len());
        Ok(body.content)
    }
}
