//! Workflow state and step updates.

use super::NodeName;
use crate::llm::Prompt;
use crate::recipe::ExtractedRecipe;
use crate::transcription::TranscriptionTool;
use crate::video_source::VideoMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Recipe information accumulated across steps.
///
/// Keys this crate does not know about are kept in `extra` and written back
/// out alongside the known ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetails {
    #[serde(default)]
    pub recipe_raw_text: Option<String>,
    /// Set by the audio path only.
    #[serde(default)]
    pub transcription_tool: Option<TranscriptionTool>,
    /// Set by the audio path only.
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub extracted_recipe: Option<ExtractedRecipe>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One LLM exchange made by a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub node: NodeName,
    pub prompt: Prompt,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

impl MessageRecord {
    pub fn new(node: NodeName, prompt: Prompt, response: impl Into<String>) -> Self {
        Self {
            node,
            prompt,
            response: response.into(),
            timestamp: Utc::now(),
        }
    }
}

/// The record threaded through the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub video_url: String,
    pub video_metadata: VideoMetadata,
    #[serde(default)]
    pub recipe_details: RecipeDetails,
    /// Every LLM exchange, in order. Append-only.
    #[serde(default)]
    pub messages: Vec<MessageRecord>,
    #[serde(default)]
    pub llm_calls: u32,
}

impl WorkflowState {
    pub fn new(video_url: impl Into<String>, video_metadata: VideoMetadata) -> Self {
        Self {
            video_url: video_url.into(),
            video_metadata,
            recipe_details: RecipeDetails::default(),
            messages: Vec::new(),
            llm_calls: 0,
        }
    }

    /// Merge a step's update.
    ///
    /// `recipe_details` fields the update leaves unset keep their values,
    /// messages are appended and the call count is added.
    pub fn apply(&mut self, update: StateUpdate) {
        let details = &mut self.recipe_details;
        let patch = update.recipe_details;

        if let Some(text) = patch.recipe_raw_text {
            details.recipe_raw_text = Some(text);
        }
        if let Some(tool) = patch.transcription_tool {
            details.transcription_tool = Some(tool);
        }
        if let Some(transcript) = patch.transcript {
            details.transcript = Some(transcript);
        }
        if let Some(recipe) = patch.extracted_recipe {
            details.extracted_recipe = Some(recipe);
        }

        self.llm_calls += update.llm_calls;
        self.messages.extend(update.messages);
    }
}

/// Fields a step sets on [`RecipeDetails`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeDetailsPatch {
    pub recipe_raw_text: Option<String>,
    pub transcription_tool: Option<TranscriptionTool>,
    pub transcript: Option<String>,
    pub extracted_recipe: Option<ExtractedRecipe>,
}

/// What a step returns for merging into [`WorkflowState`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub recipe_details: RecipeDetailsPatch,
    pub messages: Vec<MessageRecord>,
    pub llm_calls: u32,
}

impl StateUpdate {
    /// Record an LLM exchange and count the call.
    pub fn record(&mut self, node: NodeName, prompt: Prompt, response: impl Into<String>) {
        self.messages.push(MessageRecord::new(node, prompt, response));
        self.llm_calls += 1;
    }
}
