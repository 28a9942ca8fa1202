//! NoteVidya CLI entry point.

use anyhow::Result;
use clap::Parser;
use notevidya::cli::{commands, Cli, Commands};
use notevidya::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = cli.config.as_deref();
    let settings = match config {
        Some(path) => Settings::load_from(Some(&Settings::expand_path(path)))?,
        None => Settings::load()?,
    };

    let log_level = cli.log_level(&settings.general.log_level);
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("notevidya={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match &cli.command {
        Commands::Transcript { url, output } => {
            commands::run_transcript(url, output.clone(), settings, config).await?;
        }

        Commands::Notes { url, output } => {
            commands::run_notes(url, output.clone(), settings, config).await?;
        }

        Commands::Ask { url, question } => {
            commands::run_ask(url, question, settings, config).await?;
        }

        Commands::Chat { url } => {
            commands::run_chat(url, settings, config).await?;
        }

        Commands::Serve {
            host,
            port,
            max_sessions,
        } => {
            commands::run_serve(host, *port, *max_sessions, settings, config).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, config)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config)?;
        }
    }

    Ok(())
}
