//! Structure recipe text into an [`ExtractedRecipe`].

use super::state::{StateUpdate, WorkflowState};
use super::NodeName;
use crate::config::Prompts;
use crate::error::{RecipeError, Result};
use crate::llm::{invoke_structured, ChatModel};
use crate::recipe::ExtractedRecipe;
use std::collections::HashMap;
use tracing::{info, instrument};

#[instrument(skip_all)]
pub async fn format_recipe(
    model: &dyn ChatModel,
    prompts: &Prompts,
    state: &WorkflowState,
) -> Result<StateUpdate> {
    let raw_text = state
        .recipe_details
        .recipe_raw_text
        .as_deref()
        .ok_or_else(|| RecipeError::Workflow("No recipe text to structure".to_string()))?;

    let metadata = &state.video_metadata;
    let vars = HashMap::from([
        ("recipe_raw_text".to_string(), raw_text.to_string()),
        ("title".to_string(), metadata.title.clone()),
        ("tags".to_string(), metadata.tags.join(", ")),
        (
            "language".to_string(),
            metadata.language.clone().unwrap_or_else(|| "unknown".to_string()),
        ),
    ]);
    let prompt = prompts.build(&prompts.structuring, &vars);

    let (recipe, raw) = invoke_structured::<ExtractedRecipe>(model, &prompt).await?;
    info!(
        "Extracted '{}' with {} step(s)",
        recipe.title,
        recipe.step_count()
    );

    let mut update = StateUpdate::default();
    update.recipe_details.extracted_recipe = Some(recipe);
    update.record(NodeName::FormatRecipe, prompt, raw);
    Ok(update)
}
