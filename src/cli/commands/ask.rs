//! Ask command implementation.

use super::transcript::fetch_transcript;
use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    url: &str,
    question: &str,
    settings: Settings,
    config: Option<&str>,
) -> Result<()> {
    let orchestrator = preflight::orchestrator(settings, config)?;
    let (video, transcript) = fetch_transcript(&orchestrator, url).await?;
    let mut session = orchestrator.new_session(video, transcript);

    let spinner = Output::spinner("Searching transcript...");
    let result = orchestrator.ask(&mut session, question).await;
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            println!("\n{}\n", response.answer);

            if !response.sources.is_empty() {
                Output::header("Sources");
                for source in &response.sources {
                    Output::source(source.chunk.order, source.score, &source.chunk.text);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
