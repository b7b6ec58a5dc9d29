//! Transcription tools offered to the model.
//!
//! Model tool selections are untrusted input: names resolve against
//! [`TranscriptionTool`] and arguments parse into [`TranscribeArgs`] before
//! anything is dispatched.

use super::{Transcriber, Transcription};
use crate::error::{RecipeError, Result};
use crate::llm::{ToolDefinition, ToolSelection};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// The transcription tools a model can choose between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TranscriptionTool {
    /// Indian languages, including code-mixed speech. Output is translated to English.
    #[serde(rename = "transcribe_audio_indian")]
    IndianLanguage,
    /// Pure English audio.
    #[serde(rename = "transcribe_audio_english")]
    English,
}

impl TranscriptionTool {
    pub const ALL: [TranscriptionTool; 2] = [Self::IndianLanguage, Self::English];

    pub fn name(&self) -> &'static str {
        match self {
            Self::IndianLanguage => "transcribe_audio_indian",
            Self::English => "transcribe_audio_english",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    fn description(&self) -> &'static str {
        match self {
            Self::IndianLanguage => {
                "Use only for Indian languages (supports code-mixing as well). \
Transcribes and translates the audio from `audio_path` to English. \
Returns the transcribed and translated text."
            }
            Self::English => {
                "Use only for pure English audio. Transcribes the audio from `audio_path` to English. \
Returns the transcribed text."
            }
        }
    }

    /// Definition presented to the model.
    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "audio_path": {
                        "type": "string",
                        "description": "Path of the saved audio file to transcribe."
                    }
                },
                "required": ["audio_path"],
                "additionalProperties": false
            }),
        }
    }
}

impl std::fmt::Display for TranscriptionTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Arguments of a transcription tool call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscribeArgs {
    pub audio_path: PathBuf,
}

/// Validate the model's tool selections.
///
/// The first selection wins; any others are logged and ignored. An empty
/// list is `NoToolSelected` naming `tags`.
pub fn parse_selection(
    selections: &[ToolSelection],
    tags: &[String],
) -> Result<(TranscriptionTool, TranscribeArgs)> {
    let Some(first) = selections.first() else {
        return Err(RecipeError::NoToolSelected {
            tags: tags.to_vec(),
        });
    };

    if selections.len() > 1 {
        let ignored: Vec<&str> = selections[1..].iter().map(|s| s.name.as_str()).collect();
        warn!(
            "Model selected {} tools; using {} and ignoring {:?}",
            selections.len(),
            first.name,
            ignored
        );
    }

    let tool = TranscriptionTool::from_name(&first.name)
        .ok_or_else(|| RecipeError::UnknownTool(first.name.clone()))?;

    let args: TranscribeArgs =
        serde_json::from_str(&first.arguments).map_err(|e| RecipeError::InvalidToolArguments {
            tool: first.name.clone(),
            reason: e.to_string(),
        })?;

    Ok((tool, args))
}

/// Dispatch table from tool to transcriber.
pub struct ToolRegistry {
    tools: HashMap<TranscriptionTool, Arc<dyn Transcriber>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register every tool against the same transcriber.
    pub fn with_all(transcriber: Arc<dyn Transcriber>) -> Self {
        let mut registry = Self::new();
        for tool in TranscriptionTool::ALL {
            registry.register(tool, transcriber.clone());
        }
        registry
    }

    pub fn register(&mut self, tool: TranscriptionTool, transcriber: Arc<dyn Transcriber>) {
        self.tools.insert(tool, transcriber);
    }

    /// Definitions of registered tools, in a stable order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        TranscriptionTool::ALL
            .iter()
            .filter(|t| self.tools.contains_key(t))
            .map(|t| t.definition())
            .collect()
    }

    /// Run the transcriber registered for `tool`.
    pub async fn invoke(&self, tool: TranscriptionTool, audio_path: &Path) -> Result<Transcription> {
        let transcriber = self
            .tools
            .get(&tool)
            .ok_or_else(|| RecipeError::UnknownTool(tool.name().to_string()))?;

        info!("Transcribing with {}", tool);
        transcriber.transcribe(audio_path).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
