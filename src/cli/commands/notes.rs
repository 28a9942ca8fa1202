//! Notes command implementation.

use super::transcript::fetch_transcript;
use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the notes command.
pub async fn run_notes(
    url: &str,
    output: Option<String>,
    settings: Settings,
    config: Option<&str>,
) -> Result<()> {
    let orchestrator = preflight::orchestrator(settings, config)?;
    let (_, transcript) = fetch_transcript(&orchestrator, url).await?;

    let spinner = Output::spinner("Generating notes...");
    let notes = orchestrator.generate_notes(&transcript.text).await;
    spinner.finish_and_clear();

    let notes = match notes {
        Ok(n) => n,
        Err(e) => {
            Output::error(&format!("Failed to generate notes: {}", e));
            return Err(e.into());
        }
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &notes)?;
            Output::success(&format!("Notes written to {}", path));
        }
        None => println!("\n{}\n", notes),
    }

    Ok(())
}
