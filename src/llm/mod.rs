//! Chat model abstraction.
//!
//! The workflow talks to language models in three modes: plain completion,
//! structured output constrained by a JSON schema, and tool selection. Each
//! mode is a method on [`ChatModel`]; structured results are decoded into
//! Rust types through [`StructuredOutput`].

mod openai;

pub use openai::OpenAIChatModel;

use crate::error::{RecipeError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A single-turn prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
}

impl Prompt {
    pub fn user(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
        }
    }

    pub fn with_system(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            user: user.into(),
        }
    }
}

/// JSON schema a structured response must conform to.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    pub name: String,
    pub description: String,
    pub schema: serde_json::Value,
}

/// A callable the model may select.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A tool the model selected, with raw JSON arguments. Not yet validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSelection {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// Trait for chat model providers.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier, for logging.
    fn model_name(&self) -> &str;

    /// Free-text completion.
    async fn complete(&self, prompt: &Prompt) -> Result<String>;

    /// Completion constrained to `schema`. Returns the raw JSON text.
    async fn complete_structured(&self, prompt: &Prompt, schema: &OutputSchema) -> Result<String>;

    /// Ask the model to choose among `tools`. May return no selections.
    async fn select_tools(
        &self,
        prompt: &Prompt,
        tools: &[ToolDefinition],
    ) -> Result<Vec<ToolSelection>>;
}

/// A Rust type that can be requested as structured model output.
pub trait StructuredOutput: DeserializeOwned {
    fn output_schema() -> OutputSchema;
}

/// Run a structured-output call and decode the response into `T`.
///
/// Returns the decoded value together with the raw response text.
pub async fn invoke_structured<T: StructuredOutput>(
    model: &dyn ChatModel,
    prompt: &Prompt,
) -> Result<(T, String)> {
    let schema = T::output_schema();
    let raw = model.complete_structured(prompt, &schema).await?;
    let value = decode_structured::<T>(&schema.name, &raw)?;
    Ok((value, raw))
}

/// Decode raw model output, mapping failures to [`RecipeError::SchemaMismatch`].
pub fn decode_structured<T: DeserializeOwned>(schema_name: &str, raw: &str) -> Result<T> {
    serde_json::from_str(strip_code_fence(raw)).map_err(|e| RecipeError::SchemaMismatch {
        schema: schema_name.to_string(),
        reason: format!("{}. Response was: {}", e, truncate(raw, 300)),
    })
}

// Some OpenAI-compatible providers wrap JSON in a markdown fence even in JSON mode.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    }
}
