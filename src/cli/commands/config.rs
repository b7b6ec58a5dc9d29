//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings, config_path: Option<&str>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Path => {
            println!("{}", resolve_path(config_path).display());
        }

        ConfigAction::Init => {
            let path = resolve_path(config_path);
            if path.exists() {
                Output::warning(&format!("Config already exists at {}", path.display()));
            } else {
                settings.save_to(&path)?;
                Output::success(&format!("Wrote default config to {}", path.display()));
            }
        }
    }

    Ok(())
}

fn resolve_path(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(Settings::expand_path)
        .unwrap_or_else(Settings::default_config_path)
}
