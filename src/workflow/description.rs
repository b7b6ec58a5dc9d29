//! Recipe text from the video description.

use super::state::{StateUpdate, WorkflowState};
use super::NodeName;
use crate::config::Prompts;
use crate::error::Result;
use crate::llm::ChatModel;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Trim the description down to ingredients, instructions and tips.
#[instrument(skip_all)]
pub async fn fetch_recipe_from_description(
    model: &dyn ChatModel,
    prompts: &Prompts,
    state: &WorkflowState,
) -> Result<StateUpdate> {
    let vars = HashMap::from([(
        "description".to_string(),
        state.video_metadata.description.clone(),
    )]);
    let prompt = prompts.build(&prompts.description, &vars);

    let trimmed = model.complete(&prompt).await?;
    debug!("Trimmed description to {} chars", trimmed.len());

    let mut update = StateUpdate::default();
    update.recipe_details.recipe_raw_text = Some(trimmed.clone());
    update.record(NodeName::FetchRecipeFromDescription, prompt, trimmed);
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedModel;
    use crate::video_source::VideoMetadata;

    #[tokio::test]
    async fn test_sets_raw_text_only() {
        let model = ScriptedModel::new().with_completion("1 cup rice\n1/2 cup moong dal");
        let state = WorkflowState::new(
            "https://youtu.be/WR5JJP5MyN4",
            VideoMetadata {
                id: "WR5JJP5MyN4".to_string(),
                url: "https://www.youtube.com/watch?v=WR5JJP5MyN4".to_string(),
                title: "Ven Pongal".to_string(),
                description: "Ingredients: 1 cup rice, 1/2 cup moong dal. Shop my cookware: https://x"
                    .to_string(),
                language: None,
                tags: vec![],
            },
        );

        let update = fetch_recipe_from_description(&model, &Prompts::default(), &state)
            .await
            .unwrap();

        assert_eq!(
            update.recipe_details.recipe_raw_text.as_deref(),
            Some("1 cup rice\n1/2 cup moong dal")
        );
        assert!(update.recipe_details.transcript.is_none());
        assert!(update.recipe_details.transcription_tool.is_none());
        assert!(model.prompts()[0].user.contains("Shop my cookware"));
    }
}
