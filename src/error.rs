//! Error types for ingredient-finder.

use thiserror::Error;

/// Library-level error type for recipe extraction.
#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Video source error: {0}")]
    VideoSource(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Audio download failed: {0}")]
    AudioDownload(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    /// The remote batch job finished without any successful file.
    #[error("Failed to transcribe audio")]
    TranscriptionJobFailed,

    #[error("No suitable tool found for the given tags: {tags:?}")]
    NoToolSelected { tags: Vec<String> },

    #[error("Unknown tool selected by model: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for tool '{tool}': {reason}")]
    InvalidToolArguments { tool: String, reason: String },

    #[error("Model output does not match schema '{schema}': {reason}")]
    SchemaMismatch { schema: String, reason: String },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Workflow error: {0}")]
    Workflow(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for recipe extraction operations.
pub type Result<T> = std::result::Result<T, RecipeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tool_selected_names_tags() {
        let err = RecipeError::NoToolSelected {
            tags: vec!["pongal".to_string(), "tamil".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("pongal"));
        assert!(msg.contains("tamil"));
    }

    #[test]
    fn test_job_failed_message_is_fixed() {
        assert_eq!(
            RecipeError::TranscriptionJobFailed.to_string(),
            "Failed to transcribe audio"
        );
    }
}
