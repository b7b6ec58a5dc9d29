//! CLI module for ingredient-finder.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// ingredient-finder - recipes from YouTube cooking videos
///
/// Extracts structured recipes (ingredients, steps, tips and cultural context)
/// from a video's description or, when the description has no ingredients,
/// from its transcribed audio.
#[derive(Parser, Debug)]
#[command(name = "ingredient-finder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a structured recipe from a YouTube video
    Extract {
        /// YouTube URL or video ID
        url: String,

        /// Directory for the result file (default: general.output_dir)
        #[arg(short, long)]
        output_dir: Option<String>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the current configuration to the config file if none exists
    Init,
}
