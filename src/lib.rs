//! ingredient-finder - structured recipes from YouTube cooking videos
//!
//! Given a video URL, ingredient-finder fetches the video's metadata and asks
//! an LLM whether the description already lists the ingredients. If it does,
//! the description is cleaned into a recipe text; otherwise the audio is
//! downloaded, transcribed with a language-appropriate tool and trimmed to
//! the recipe-relevant part. Either way the text is finally structured into an
//! [`recipe::ExtractedRecipe`].
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `video_source` - Video metadata (YouTube via yt-dlp)
//! - `audio` - MP3 download with an on-disk reuse cache
//! - `transcription` - Speech-to-text tools, the Sarvam batch client and caching
//! - `cache` - Key/value cache backends for transcriptions
//! - `llm` - Chat model abstraction with structured output and tool selection
//! - `recipe` - The extracted recipe model and its strict JSON schema
//! - `workflow` - The four-node extraction graph and its shared state
//! - `orchestrator` - Wires everything together and saves results
//!
//! # Example
//!
//! ```rust,no_run
//! use ingredient_finder::config::Settings;
//! use ingredient_finder::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let state = orchestrator.process_video("https://youtu.be/3Hn6iwieyX4").await?;
//!     let path = orchestrator.save_result(&state, None)?;
//!     println!("Saved to {}", path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod recipe;
pub mod transcription;
pub mod video_source;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use error::{RecipeError, Result};
