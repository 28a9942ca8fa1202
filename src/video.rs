//! YouTube URL normalization.
//!
//! Turns whatever the user pasted into a [`VideoRef`]: the 11-character video
//! identifier plus the canonical `https://youtu.be/<id>` URL. Two passes are
//! available: a lenient [`extract_video_id`] and a stricter
//! [`verify_youtube_url`] that also canonicalizes and refuses playlist-only
//! links. [`normalize`] runs the first and falls back to the second.

use crate::error::{NoteVidyaError, Result};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("Invalid regex"));

/// Hosts that serve YouTube videos.
const YOUTUBE_HOSTS: &[&str] = &["youtube.com", "www.youtube.com", "m.youtube.com", "youtu.be"];

/// Path prefixes that are followed by a video id on youtube.com.
const ID_PATH_PREFIXES: &[&str] = &["embed", "shorts", "v", "live"];

/// A validated reference to a single YouTube video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VideoRef {
    id: String,
    canonical_url: String,
}

impl VideoRef {
    /// Build a reference from a bare identifier, if it is well formed.
    pub fn from_id(id: &str) -> Option<Self> {
        is_valid_video_id(id).then(|| Self {
            id: id.to_string(),
            canonical_url: canonical_url(id),
        })
    }

    /// The 11-character video identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// `https://youtu.be/<id>`.
    pub fn canonical_url(&self) -> &str {
        &self.canonical_url
    }

    /// `https://www.youtube.com/watch?v=<id>`.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

impl std::fmt::Display for VideoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

impl std::str::FromStr for VideoRef {
    type Err = NoteVidyaError;

    fn from_str(s: &str) -> Result<Self> {
        normalize(s).ok_or_else(|| NoteVidyaError::InvalidUrl(s.trim().to_string()))
    }
}

/// Check an identifier against `^[A-Za-z0-9_-]{11}$`.
pub fn is_valid_video_id(id: &str) -> bool {
    VIDEO_ID.is_match(id)
}

/// Canonical short URL for an identifier.
pub fn canonical_url(id: &str) -> String {
    format!("https://youtu.be/{}", id)
}

/// Extract the video identifier from a watch, short-link, embed or shorts URL.
///
/// Returns `None` for non-YouTube or malformed input.
pub fn extract_video_id(input: &str) -> Option<String> {
    let url = parse_url(input)?;
    let host = youtube_host(&url)?;

    let mut candidates = Vec::new();

    if let Some(v) = query_param(&url, "v") {
        candidates.push(v);
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    if host == "youtu.be" {
        if let Some(first) = segments.first() {
            candidates.push(first.to_string());
        }
    }

    for pair in segments.windows(2) {
        if ID_PATH_PREFIXES.contains(&pair[0]) {
            candidates.push(pair[1].to_string());
        }
    }

    candidates.into_iter().find(|c| is_valid_video_id(c))
}

/// Confirm the URL points at a single video and return `https://youtu.be/<id>`.
///
/// Pure playlist links (`/playlist`, or a query with only `list`) are refused.
pub fn verify_youtube_url(input: &str) -> Option<String> {
    let url = parse_url(input)?;
    let host = youtube_host(&url)?;

    if url.path() == "/playlist" {
        debug!("Rejecting playlist URL");
        return None;
    }

    let video_id = if let Some(v) = query_param(&url, "v") {
        Some(v)
    } else if host == "youtu.be" {
        Some(url.path().trim_start_matches('/').to_string())
    } else if url.path().contains("/embed/") {
        url.path().rsplit('/').next().map(str::to_string)
    } else {
        None
    };

    match video_id {
        Some(id) if is_valid_video_id(&id) => Some(canonical_url(&id)),
        None if query_param(&url, "list").is_some() => {
            debug!("Rejecting URL with a playlist but no video");
            None
        }
        _ => None,
    }
}

/// Lenient extraction first, then the strict pass.
pub fn normalize(input: &str) -> Option<VideoRef> {
    if let Some(id) = extract_video_id(input) {
        return VideoRef::from_id(&id);
    }

    let canonical = verify_youtube_url(input)?;
    extract_video_id(&canonical).and_then(|id| VideoRef::from_id(&id))
}

fn parse_url(input: &str) -> Option<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    match Url::parse(trimmed) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{}", trimmed)).ok()
        }
        Err(_) => None,
    }
}

fn youtube_host(url: &Url) -> Option<&'static str> {
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?;
    YOUTUBE_HOSTS
        .iter()
        .find(|h| h.eq_ignore_ascii_case(host))
        .copied()
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, v)| k == name && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}
