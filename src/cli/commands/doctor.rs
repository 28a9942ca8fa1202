//! Doctor command - verify system requirements and configuration.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::{Secrets, Settings, OPENAI_API_KEY_ENV, TRANSCRIPT_API_KEY_ENV};
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config: Option<&str>) -> anyhow::Result<()> {
    Output::header("NoteVidya Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    // Missing tools only disable the local fallback, so they are warnings.
    println!("{}", style("Local Transcription Fallback").bold());
    let tool_checks: Vec<CheckResult> = preflight::fallback_tools(settings)
        .iter()
        .map(|(name, arg)| check_tool(name, arg))
        .collect();
    for check in &tool_checks {
        check.print();
    }
    checks.extend(tool_checks);

    println!();

    println!("{}", style("API Credentials").bold());
    let secrets_path = preflight::secrets_path(config);
    let credential_checks = check_credentials(&secrets_path);
    for check in &credential_checks {
        check.print();
    }
    checks.extend(credential_checks);

    println!();

    println!("{}", style("Directories").bold());
    let dir_checks = check_directories(settings);
    for check in &dir_checks {
        check.print();
    }
    checks.extend(dir_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config);
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Error)
        .count();
    let warnings = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Warning)
        .count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using NoteVidya.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! NoteVidya is ready to use.");
    }

    Ok(())
}

fn check_tool(name: &str, version_arg: &str) -> CheckResult {
    let hint = install_hint(name);
    match preflight::check_tool(name, version_arg) {
        Ok(version) => {
            let shown: String = version.chars().take(50).collect();
            let message = if shown.is_empty() {
                "installed"
            } else {
                shown.as_str()
            };
            CheckResult::ok(name, message)
        }
        Err(e) => CheckResult::warning(name, &e.to_string(), hint),
    }
}

fn check_credentials(path: &Path) -> Vec<CheckResult> {
    let secrets = match Secrets::load_from(path) {
        Ok(s) => s,
        Err(e) => {
            return vec![CheckResult::error(
                "secrets.toml",
                &e.to_string(),
                &format!("Fix the file at {}", path.display()),
            )]
        }
    };

    let hint = format!(
        "Add it under [api] in {} or export the environment variable",
        path.display()
    );
    [
        (TRANSCRIPT_API_KEY_ENV, secrets.transcript_api_key.as_deref()),
        (OPENAI_API_KEY_ENV, secrets.openai_api_key.as_deref()),
    ]
    .into_iter()
    .map(|(name, value)| match value {
        Some(key) => CheckResult::ok(name, &format!("configured ({})", mask(key))),
        None => CheckResult::error(name, "not set", &hint),
    })
    .collect()
}

fn check_directories(settings: &Settings) -> Vec<CheckResult> {
    [
        ("Transcript cache", settings.transcripts_dir()),
        ("Temp directory", settings.temp_dir()),
    ]
    .into_iter()
    .map(|(name, dir)| {
        if dir.exists() {
            CheckResult::ok(name, &dir.display().to_string())
        } else {
            CheckResult::warning(
                name,
                &format!("{} (will be created)", dir.display()),
                "Directory will be created on first use",
            )
        }
    })
    .collect()
}

fn check_config_file(config: Option<&str>) -> CheckResult {
    let config_path = match config {
        Some(path) => Settings::expand_path(path),
        None => Settings::default_config_path(),
    };
    if config_path.exists() {
        CheckResult::ok("Config file", &config_path.display().to_string())
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: notevidya config init",
        )
    }
}

/// Show only the ends of a key.
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn install_hint(tool: &str) -> &'static str {
    match tool {
        "yt-dlp" if cfg!(target_os = "macos") => "Install with: brew install yt-dlp",
        "yt-dlp" => "Install with: pip install yt-dlp (or your package manager)",
        _ => "Install with: pip install openai-whisper (or set transcription.provider = \"openai\")",
    }
}
