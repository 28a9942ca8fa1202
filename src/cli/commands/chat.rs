//! Interactive chat command.

use super::transcript::fetch_transcript;
use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::session::Role;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(url: &str, settings: Settings, config: Option<&str>) -> Result<()> {
    let orchestrator = preflight::orchestrator(settings, config)?;
    let (video, transcript) = fetch_transcript(&orchestrator, url).await?;
    let mut session = orchestrator.new_session(video, transcript);

    println!("\n{}", style("NoteVidya Chat").bold().cyan());
    println!(
        "{}\n",
        style("How may I help you? Type 'history' to review, 'exit' to quit.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("history") {
            for turn in session.history() {
                let who = match turn.role {
                    Role::User => style("You:").green().bold(),
                    Role::Assistant => style("NoteVidya:").cyan().bold(),
                };
                println!("{} {}", who, turn.content);
            }
            continue;
        }

        if !session.is_indexed() {
            Output::info("Indexing transcript...");
        }

        match orchestrator.ask(&mut session, input).await {
            Ok(response) => {
                println!("\n{} {}\n", style("NoteVidya:").cyan().bold(), response.answer);
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}
