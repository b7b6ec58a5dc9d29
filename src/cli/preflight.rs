//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting a run that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{RecipeError, Result};
use std::process::Command;

/// Checks before running an extraction.
///
/// Fails when the chat model key, yt-dlp or ffmpeg is missing. The
/// transcription key only matters when a transcription is not already
/// cached, so its absence is returned as a warning.
pub fn check_extract(settings: &Settings) -> Result<Vec<String>> {
    check_api_key(&settings.llm.api_key_env)?;
    check_tool("yt-dlp")?;
    check_tool("ffmpeg")?;

    let mut warnings = Vec::new();
    if check_api_key(&settings.transcription.api_key_env).is_err() {
        warnings.push(format!(
            "{} not set; audio transcription will fail unless cached",
            settings.transcription.api_key_env
        ));
    }
    Ok(warnings)
}

/// Check that an API key variable is set and non-empty.
fn check_api_key(var: &str) -> Result<()> {
    match std::env::var(var) {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(RecipeError::Config(format!(
            "{var} is empty. Set it with: export {var}='...'"
        ))),
        Err(_) => Err(RecipeError::Config(format!(
            "{var} not set. Set it with: export {var}='...'"
        ))),
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    // ffmpeg uses -version (single dash)
    let version_arg = match name {
        "ffmpeg" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(RecipeError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(RecipeError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(RecipeError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
