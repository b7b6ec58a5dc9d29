//! Route between description and audio extraction.

use super::state::{StateUpdate, WorkflowState};
use super::NodeName;
use crate::config::Prompts;
use crate::error::Result;
use crate::llm::{invoke_structured, ChatModel, OutputSchema, StructuredOutput};
use crate::recipe::schema::{boolean, object};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Whether a description lists usable ingredients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HasIngredients {
    pub has_ingredients: bool,
}

impl StructuredOutput for HasIngredients {
    fn output_schema() -> OutputSchema {
        OutputSchema {
            name: "has_ingredients".to_string(),
            description: "Whether the text contains valid cooking ingredients.".to_string(),
            schema: object(vec![(
                "has_ingredients",
                boolean("True if the text lists cooking ingredients."),
            )]),
        }
    }
}

/// Where the recipe text will come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Description,
    Audio,
}

impl Route {
    pub fn node(&self) -> NodeName {
        match self {
            Route::Description => NodeName::FetchRecipeFromDescription,
            Route::Audio => NodeName::FetchRecipeFromAudio,
        }
    }
}

/// Ask the model whether the description already carries the ingredients.
#[instrument(skip_all)]
pub async fn decide_source(
    model: &dyn ChatModel,
    prompts: &Prompts,
    state: &WorkflowState,
) -> Result<(Route, StateUpdate)> {
    let vars = HashMap::from([(
        "description".to_string(),
        state.video_metadata.description.clone(),
    )]);
    let prompt = prompts.build(&prompts.decision, &vars);

    let (answer, raw) = invoke_structured::<HasIngredients>(model, &prompt).await?;

    let route = if answer.has_ingredients {
        Route::Description
    } else {
        Route::Audio
    };
    info!("Description has ingredients: {}", answer.has_ingredients);

    let mut update = StateUpdate::default();
    update.record(NodeName::DecideSource, prompt, raw);
    Ok((route, update))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecipeError;
    use crate::testing::ScriptedModel;
    use crate::video_source::VideoMetadata;

    fn state_with_description(description: &str) -> WorkflowState {
        WorkflowState::new(
            "https://www.youtube.com/watch?v=3Hn6iwieyX4",
            VideoMetadata {
                id: "3Hn6iwieyX4".to_string(),
                url: "https://www.youtube.com/watch?v=3Hn6iwieyX4".to_string(),
                title: "Ambur Biryani".to_string(),
                description: description.to_string(),
                language: Some("ta".to_string()),
                tags: vec!["biryani".to_string()],
            },
        )
    }

    #[tokio::test]
    async fn test_ingredients_route_to_description() {
        let model = ScriptedModel::new().with_structured(r#"{"has_ingredients": true}"#);
        let state = state_with_description("Ingredients: 1 kg chicken, 1 kg seeraga samba rice");

        let (route, update) = decide_source(&model, &Prompts::default(), &state)
            .await
            .unwrap();

        assert_eq!(route, Route::Description);
        assert_eq!(update.llm_calls, 1);
        assert!(model.prompts()[0].user.contains("seeraga samba"));
    }

    #[tokio::test]
    async fn test_commentary_routes_to_audio() {
        let model = ScriptedModel::new().with_structured(r#"{"has_ingredients": false}"#);
        let state = state_with_description("Subscribe for more! Follow us on instagram.");

        let (route, _) = decide_source(&model, &Prompts::default(), &state)
            .await
            .unwrap();
        assert_eq!(route, Route::Audio);
        assert_eq!(route.node(), NodeName::FetchRecipeFromAudio);
    }

    #[tokio::test]
    async fn test_off_schema_answer_is_fatal() {
        let model = ScriptedModel::new().with_structured(r#"{"answer": "yes"}"#);
        let state = state_with_description("");

        let err = decide_source(&model, &Prompts::default(), &state)
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeError::SchemaMismatch { .. }));
    }
}
