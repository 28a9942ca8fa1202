//! Transcript command implementation.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::transcript::{Transcript, TranscriptSource};
use crate::video::VideoRef;
use anyhow::Result;

/// Run the transcript command.
pub async fn run_transcript(
    url: &str,
    output: Option<String>,
    settings: Settings,
    config: Option<&str>,
) -> Result<()> {
    let orchestrator = preflight::orchestrator(settings, config)?;
    let (_, transcript) = fetch_transcript(&orchestrator, url).await?;

    match output {
        Some(path) => {
            std::fs::write(&path, &transcript.text)?;
            Output::success(&format!("Transcript written to {}", path));
        }
        None => println!("{}", transcript.text),
    }

    Ok(())
}

/// Resolve and acquire, printing fallback warnings and the final status.
pub(crate) async fn fetch_transcript(
    orchestrator: &Orchestrator,
    url: &str,
) -> Result<(VideoRef, Transcript)> {
    let video = match orchestrator.resolve_video(url) {
        Ok(v) => v,
        Err(e) => {
            Output::error("Please enter a valid YouTube video URL.");
            return Err(e.into());
        }
    };

    let spinner = Output::spinner("Fetching transcript...");
    let acquisition = orchestrator.acquire(&video).await;
    spinner.finish_and_clear();

    for warning in &acquisition.warnings {
        Output::warning(warning);
    }

    match acquisition.into_result() {
        Ok(transcript) => {
            Output::success(&format!(
                "Transcript ready for {} ({})",
                video.canonical_url(),
                describe_source(transcript.source)
            ));
            Ok((video, transcript))
        }
        Err(e) => {
            Output::error(&e.to_string());
            Err(e.into())
        }
    }
}

fn describe_source(source: TranscriptSource) -> &'static str {
    match source {
        TranscriptSource::Cache => "from local cache",
        TranscriptSource::Api => "from transcript service",
        TranscriptSource::Local => "transcribed locally",
    }
}
