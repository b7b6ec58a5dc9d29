//! Recipe schema produced by the structuring step.

mod model;
pub mod schema;

pub use model::{
    AuthorSubstitution, CommonMistake, ExtractedRecipe, RecipeMetadata, Step, StepIngredient,
};
