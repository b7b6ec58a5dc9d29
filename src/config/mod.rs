//! Configuration module for ingredient-finder.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{PromptTemplate, Prompts};
pub use settings::{
    CacheBackend, CacheSettings, GeneralSettings, LlmSettings, PromptSettings, Settings,
    TranscriptionSettings,
};
