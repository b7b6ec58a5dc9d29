//! Recipe extraction workflow.
//!
//! Each step reads the [`WorkflowState`] and returns a [`StateUpdate`]; the
//! [`Workflow`] runner merges updates and picks the branch.

mod audio;
mod decision;
mod description;
mod graph;
mod state;
mod structuring;

pub use audio::fetch_recipe_from_audio;
pub use decision::{decide_source, HasIngredients, Route};
pub use description::fetch_recipe_from_description;
pub use graph::Workflow;
pub use state::{MessageRecord, RecipeDetails, RecipeDetailsPatch, StateUpdate, WorkflowState};
pub use structuring::format_recipe;

use serde::{Deserialize, Serialize};

/// Workflow steps, as recorded in the message log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeName {
    DecideSource,
    FetchRecipeFromDescription,
    FetchRecipeFromAudio,
    FormatRecipe,
}

impl NodeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeName::DecideSource => "decide_source",
            NodeName::FetchRecipeFromDescription => "fetch_recipe_from_description",
            NodeName::FetchRecipeFromAudio => "fetch_recipe_from_audio",
            NodeName::FormatRecipe => "format_recipe",
        }
    }
}

impl std::fmt::Display for NodeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_names_match_serde() {
        for node in [
            NodeName::DecideSource,
            NodeName::FetchRecipeFromDescription,
            NodeName::FetchRecipeFromAudio,
            NodeName::FormatRecipe,
        ] {
            let json = serde_json::to_value(node).unwrap();
            assert_eq!(json, node.as_str());
        }
    }
}
