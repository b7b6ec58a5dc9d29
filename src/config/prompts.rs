//! Prompt templates for the extraction workflow.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.
//! Each file holds one template (`system` and `user` keys):
//! `decision.toml`, `description.toml`, `tool_selection.toml`,
//! `transcript_trim.toml` and `structuring.toml`.

use crate::llm::Prompt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A single system/user prompt pair. An empty system prompt is omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplate {
    pub system: String,
    pub user: String,
}

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    /// Does the description contain ingredients?
    pub decision: PromptTemplate,
    /// Trim a description down to the recipe.
    pub description: PromptTemplate,
    /// Pick a transcription tool from tags and language.
    pub tool_selection: PromptTemplate,
    /// Trim a transcript down to the recipe.
    pub transcript_trim: PromptTemplate,
    /// Convert trimmed text into the recipe schema.
    pub structuring: PromptTemplate,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            decision: PromptTemplate {
                system: String::new(),
                user: "Does this video description contain valid cooking ingredients? \
Ignore links, timestamps, and general commentary.\n\n\
Video description: {{description}}"
                    .to_string(),
            },

            description: PromptTemplate {
                system: String::new(),
                user: "Trim the video description to only include the ingredients, instructions \
and important tips/callouts. Remove any extra information.\n\n{{description}}"
                    .to_string(),
            },

            tool_selection: PromptTemplate {
                system: String::new(),
                user: "Carefully reason and choose the right language-tool to transcribe \
(and translate) the audio based on the following metadata:\n\
tags: {{tags}}\n\
language: {{language}}\n\
saved_audio_path: {{audio_path}}"
                    .to_string(),
            },

            transcript_trim: PromptTemplate {
                system: String::new(),
                user: "Trim the transcribed text to only include the cooking instructions, \
ingredients and important tips/callouts. Remove any extra information.\n\n\
Recipe: {{transcript}}"
                    .to_string(),
            },

            structuring: PromptTemplate {
                system: r#"You extract recipes from cooking video text into a fixed schema.

Hard rules:
1. Extraction only. Never infer, enrich or normalize. If the author did not say it, leave the field null or the list empty.
2. Preserve the author's verbatim phrasing for quantities, timing, sensory cues and commentary ("a handful", "about 10 minutes", "until the oil separates").
3. One step in the schema is one logical phase as the author presented it. Do not reorder, merge or split the author's steps.
4. Filter transcript noise (filler words, greetings, sponsor segments, subscribe requests, tangents) while keeping every piece of recipe signal.

Field guidance:
- id: kebab-case slug of the recipe title, e.g. "ambur-chicken-biryani".
- ingredients belong to the step where the author introduces or uses them.
- common_mistakes: only mistakes the author explicitly warns about.
- substitutions: only substitutions the author explicitly suggests.
- cultural_context: origin, history, regional significance, family connection, serving traditions, verbatim.
- sensory_target: the author's description of how the finished dish should taste, feel or look."#
                    .to_string(),
                user: "Video title: {{title}}\n\
Tags: {{tags}}\n\
Language: {{language}}\n\n\
Recipe text:\n{{recipe_raw_text}}"
                    .to_string(),
            },

            variables: HashMap::new(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            load_override(&custom_path, "decision.toml", &mut prompts.decision)?;
            load_override(&custom_path, "description.toml", &mut prompts.description)?;
            load_override(&custom_path, "tool_selection.toml", &mut prompts.tool_selection)?;
            load_override(&custom_path, "transcript_trim.toml", &mut prompts.transcript_trim)?;
            load_override(&custom_path, "structuring.toml", &mut prompts.structuring)?;
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// Render a full system/user template into a model prompt.
    pub fn build(&self, template: &PromptTemplate, vars: &HashMap<String, String>) -> Prompt {
        let system = self.render_with_custom(&template.system, vars);
        let user = self.render_with_custom(&template.user, vars);

        if system.trim().is_empty() {
            Prompt::user(user)
        } else {
            Prompt::with_system(system, user)
        }
    }
}

fn load_override(dir: &Path, file: &str, target: &mut PromptTemplate) -> crate::error::Result<()> {
    let path = dir.join(file);
    if path.exists() {
        let content = std::fs::read_to_string(&path)?;
        *target = toml::from_str(&content)?;
    }
    Ok(())
}
