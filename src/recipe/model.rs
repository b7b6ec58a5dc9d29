//! Recipe data model.
//!
//! Every free-text field carries the author's own wording. A fact the author
//! never states stays `None` or empty; nothing here has an inferred default.

use serde::{Deserialize, Serialize};

/// Recipe-level facts the author states.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeMetadata {
    #[serde(default)]
    pub cuisine: Option<String>,
    /// What makes this regional version distinct, in the author's words.
    #[serde(default)]
    pub region_notes: Option<String>,
    /// "serves 4", "a large pot".
    #[serde(default)]
    pub servings: Option<String>,
    /// "about an hour".
    #[serde(default)]
    pub total_time: Option<String>,
}

/// An ingredient as it appears in a specific step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepIngredient {
    /// Regional terms preserved (seeraga samba, kashmiri mirchi).
    pub name: String,
    /// "2 cups", "a handful", "enough to coat the pan".
    #[serde(default)]
    pub quantity: Option<String>,
    /// "finely sliced".
    #[serde(default)]
    pub prep: Option<String>,
    #[serde(default)]
    pub author_note: Option<String>,
}

/// A mistake the author explicitly warns about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonMistake {
    pub mistake: String,
    #[serde(default)]
    pub consequence: Option<String>,
    #[serde(default)]
    pub fix: Option<String>,
}

/// One logical phase of the recipe, as the author presented it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub step: u32,
    pub title: String,
    pub instruction: String,
    /// Time, sensory cue, or both: "about 10 minutes", "until oil separates".
    #[serde(default)]
    pub duration: Option<String>,
    /// Hands-off waiting such as marinating or soaking.
    #[serde(default)]
    pub is_passive: bool,
    #[serde(default)]
    pub ingredients: Vec<StepIngredient>,
    #[serde(default)]
    pub sensory_checkpoint: Option<String>,
    #[serde(default)]
    pub author_tips: Vec<String>,
    #[serde(default)]
    pub common_mistakes: Vec<CommonMistake>,
    #[serde(default)]
    pub equipment: Vec<String>,
}

/// A substitution the author explicitly suggests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorSubstitution {
    pub original: String,
    pub substitute: String,
    #[serde(default)]
    pub context: Option<String>,
}

/// Faithful extraction of author-stated recipe information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecipe {
    /// kebab-case slug, e.g. "ambur-chicken-biryani".
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub metadata: RecipeMetadata,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub substitutions: Vec<AuthorSubstitution>,
    /// Origin, history, family connection, serving traditions.
    #[serde(default)]
    pub cultural_context: Vec<String>,
    /// How the finished dish should taste, feel or look.
    #[serde(default)]
    pub sensory_target: Vec<String>,
}

impl ExtractedRecipe {
    /// All ingredients across steps, in step order.
    pub fn ingredients(&self) -> impl Iterator<Item = &StepIngredient> {
        self.steps.iter().flat_map(|s| s.ingredients.iter())
    }

    /// Total number of steps the author described.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_optional_fields_stay_empty() {
        let json = r#"{
            "id": "plain-rice",
            "title": "Plain Rice",
            "steps": [{"step": 1, "title": "Cook", "instruction": "Cook the rice"}]
        }"#;

        let recipe: ExtractedRecipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.metadata, RecipeMetadata::default());
        assert!(recipe.substitutions.is_empty());
        assert!(recipe.cultural_context.is_empty());

        let step = &recipe.steps[0];
        assert!(step.duration.is_none());
        assert!(!step.is_passive);
        assert!(step.ingredients.is_empty());
    }

    #[test]
    fn test_ingredients_in_step_order() {
        let json = r#"{
            "id": "pongal",
            "title": "Ven Pongal",
            "metadata": {"cuisine": null, "region_notes": null, "servings": "serves 4", "total_time": null},
            "steps": [
                {"step": 1, "title": "Roast", "instruction": "Dry roast the dal",
                 "ingredients": [{"name": "moong dal", "quantity": "1/2 cup", "prep": null, "author_note": null}]},
                {"step": 2, "title": "Cook", "instruction": "Pressure cook with rice",
                 "ingredients": [{"name": "raw rice", "quantity": "1 cup", "prep": "washed", "author_note": null}]}
            ]
        }"#;

        let recipe: ExtractedRecipe = serde_json::from_str(json).unwrap();
        let names: Vec<_> = recipe.ingredients().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["moong dal", "raw rice"]);
        assert_eq!(recipe.step_count(), 2);
        assert_eq!(recipe.metadata.servings.as_deref(), Some("serves 4"));
    }
}
