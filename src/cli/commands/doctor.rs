//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::{CacheBackend, Settings};
use console::style;
use std::path::Path;
use std::process::Command;

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
pub fn run_doctor(settings: &Settings, config_path: Option<&str>) -> anyhow::Result<()> {
    Output::header("ingredient-finder doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let sections = [
        (
            "External Tools",
            vec![
                check_tool("yt-dlp", "--version", install_hint_ytdlp()),
                check_tool("ffmpeg", "-version", install_hint_ffmpeg()),
            ],
        ),
        (
            "API Configuration",
            vec![
                check_api_key(&settings.llm.api_key_env, true),
                check_api_key(&settings.transcription.api_key_env, false),
            ],
        ),
        ("Directories", check_directories(settings)),
        ("Configuration", vec![check_config_file(config_path)]),
    ];

    for (title, checks) in &sections {
        println!("{}", style(title).bold());
        for check in checks {
            check.print();
        }
        println!();
    }

    let checks: Vec<&CheckResult> = sections.iter().flat_map(|(_, c)| c.iter()).collect();
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before extracting recipes.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! ingredient-finder is ready to use.");
    }

    Ok(())
}

/// Check if an external tool is available.
fn check_tool(name: &str, version_arg: &str, hint: &str) -> CheckResult {
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => {
            let version: String = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .chars()
                .take(50)
                .collect();
            CheckResult::ok(name, &version)
        }
        Ok(_) => CheckResult::error(name, "installed but not working", hint),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::error(name, "not found", hint)
        }
        Err(e) => CheckResult::error(name, &format!("error: {}", e), hint),
    }
}

/// Check an API key variable. Optional keys only warn when missing.
fn check_api_key(var: &str, required: bool) -> CheckResult {
    match std::env::var(var) {
        Ok(key) if !key.is_empty() => CheckResult::ok(var, &format!("configured ({})", mask(&key))),
        _ if required => CheckResult::error(var, "not set", &format!("Set with: export {}='...'", var)),
        _ => CheckResult::warning(
            var,
            "not set",
            "Needed only when a video's audio has to be transcribed",
        ),
    }
}

fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn check_dir(name: &str, path: &Path) -> CheckResult {
    if path.is_dir() {
        CheckResult::ok(name, &path.display().to_string())
    } else {
        CheckResult::warning(
            name,
            &format!("{} (will be created)", path.display()),
            "Directory will be created on first use",
        )
    }
}

/// Check output and cache locations.
fn check_directories(settings: &Settings) -> Vec<CheckResult> {
    let mut results = vec![
        check_dir("Output directory", &settings.output_dir()),
        check_dir("Audio cache", &settings.audio_dir()),
    ];

    match settings.cache.backend {
        CacheBackend::File => {
            results.push(check_dir("Transcription cache", &settings.transcription_cache_dir()));
        }
        CacheBackend::Sqlite => {
            let db_path = settings.sqlite_path();
            if db_path.exists() {
                let size = std::fs::metadata(&db_path)
                    .map(|m| format_size(m.len()))
                    .unwrap_or_else(|_| "unknown size".to_string());
                results.push(CheckResult::ok(
                    "Transcription cache",
                    &format!("{} ({})", db_path.display(), size),
                ));
            } else {
                results.push(CheckResult::warning(
                    "Transcription cache",
                    &format!("{} (not created yet)", db_path.display()),
                    "Database will be created on first transcription",
                ));
            }
        }
        CacheBackend::Memory => results.push(CheckResult::warning(
            "Transcription cache",
            "in memory",
            "Transcriptions are not kept between runs",
        )),
    }

    results
}

/// Check if config file exists.
fn check_config_file(config_path: Option<&str>) -> CheckResult {
    let path = config_path
        .map(Settings::expand_path)
        .unwrap_or_else(Settings::default_config_path);

    if path.exists() {
        CheckResult::ok("Config file", &path.display().to_string())
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: ingredient-finder config init",
        )
    }
}

/// Format file size in human-readable format.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Platform-specific install hint for yt-dlp.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}

/// Platform-specific install hint for ffmpeg.
fn install_hint_ffmpeg() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install ffmpeg"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install ffmpeg (or your package manager)"
    } else {
        "Install from: https://ffmpeg.org/download.html"
    }
}
