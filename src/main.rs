//! ingredient-finder CLI entry point.

use anyhow::Result;
use clap::Parser;
use ingredient_finder::cli::{commands, Cli, Commands};
use ingredient_finder::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("ingredient_finder={}", log_level)
        })))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&Settings::expand_path(path)))?,
        None => Settings::load()?,
    };

    match &cli.command {
        Commands::Extract { url, output_dir } => {
            commands::run_extract(url, output_dir.clone(), settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, cli.config.as_deref())?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, cli.config.as_deref())?;
        }
    }

    Ok(())
}
