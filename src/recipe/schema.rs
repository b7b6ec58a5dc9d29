//! JSON schemas for structured recipe output.
//!
//! Schemas are written for strict structured-output mode: every object lists
//! all of its properties as required and forbids additional properties, and
//! optional facts are expressed as nullable types rather than omitted keys.

use super::ExtractedRecipe;
use crate::llm::{OutputSchema, StructuredOutput};
use serde_json::{json, Map, Value};

pub(crate) fn string(description: &str) -> Value {
    json!({"type": "string", "description": description})
}

pub(crate) fn nullable_string(description: &str) -> Value {
    json!({"type": ["string", "null"], "description": description})
}

pub(crate) fn boolean(description: &str) -> Value {
    json!({"type": "boolean", "description": description})
}

fn integer(description: &str) -> Value {
    json!({"type": "integer", "description": description})
}

fn array_of(items: Value, description: &str) -> Value {
    json!({"type": "array", "items": items, "description": description})
}

/// Strict object schema. All listed properties are required.
pub(crate) fn object(properties: Vec<(&str, Value)>) -> Value {
    let required: Vec<Value> = properties
        .iter()
        .map(|(name, _)| Value::String(name.to_string()))
        .collect();

    let mut props = Map::new();
    for (name, schema) in properties {
        props.insert(name.to_string(), schema);
    }

    json!({
        "type": "object",
        "properties": props,
        "required": required,
        "additionalProperties": false
    })
}

fn metadata_schema() -> Value {
    object(vec![
        ("cuisine", nullable_string("Cuisine only if the author names it.")),
        (
            "region_notes",
            nullable_string(
                "Author's description of regional style, significance or what makes this version distinct.",
            ),
        ),
        (
            "servings",
            nullable_string("Author verbatim: 'serves 4', 'serves 4-6', 'a large pot'."),
        ),
        (
            "total_time",
            nullable_string("Author verbatim: 'about an hour', '30 minutes'. Null if not mentioned."),
        ),
    ])
}

fn ingredient_schema() -> Value {
    object(vec![
        (
            "name",
            string("Author verbatim: preserve regional terms (seeraga samba, kashmiri mirchi)."),
        ),
        (
            "quantity",
            nullable_string("Author verbatim: '2 cups', 'a handful', 'enough to coat the pan'."),
        ),
        (
            "prep",
            nullable_string("Author verbatim: 'finely sliced', 'dry the pieces well'."),
        ),
        (
            "author_note",
            nullable_string(
                "Author verbatim commentary on this ingredient here: why it matters, what not to substitute, what to look for.",
            ),
        ),
    ])
}

fn mistake_schema() -> Value {
    object(vec![
        ("mistake", string("The mistake the author warns about.")),
        ("consequence", nullable_string("What goes wrong, if stated.")),
        ("fix", nullable_string("How to avoid or fix it, if stated.")),
    ])
}

fn step_schema() -> Value {
    object(vec![
        ("step", integer("1-based step number in the author's order.")),
        ("title", string("Short descriptive title for the step.")),
        (
            "instruction",
            string("Author verbatim: faithful to the author's level of detail, intent and technique."),
        ),
        (
            "duration",
            nullable_string(
                "How the author describes timing/completion for this step, as-is. Time ('about 10 minutes'), sensory ('until oil separates') or both.",
            ),
        ),
        (
            "is_passive",
            boolean("True if the step is hands-off waiting: marinating, simmering, soaking."),
        ),
        (
            "ingredients",
            array_of(
                ingredient_schema(),
                "Ingredients introduced or used in this step, with step-specific context.",
            ),
        ),
        (
            "sensory_checkpoint",
            nullable_string(
                "Author verbatim: how the dish should taste/smell/look at the end of this step.",
            ),
        ),
        (
            "author_tips",
            array_of(
                string("A tip"),
                "Author verbatim: advice, emphasis, warnings given during this step.",
            ),
        ),
        (
            "common_mistakes",
            array_of(
                mistake_schema(),
                "Only mistakes the author explicitly warns about. Usually empty.",
            ),
        ),
        (
            "equipment",
            array_of(string("A piece of equipment"), "Equipment the author mentions for this step."),
        ),
    ])
}

fn substitution_schema() -> Value {
    object(vec![
        ("original", string("Ingredient name being substituted.")),
        ("substitute", string("What the author suggests instead.")),
        (
            "context",
            nullable_string("Author's commentary: when to use it, tradeoffs, what changes. Verbatim."),
        ),
    ])
}

/// Schema for [`ExtractedRecipe`].
pub fn extracted_recipe_schema() -> Value {
    object(vec![
        ("id", string("kebab-case slug, e.g. 'ambur-chicken-biryani'.")),
        ("title", string("Recipe title as the author names it.")),
        ("metadata", metadata_schema()),
        ("steps", array_of(step_schema(), "The recipe steps in the author's order.")),
        (
            "substitutions",
            array_of(substitution_schema(), "Author-stated substitutions. Usually sparse or empty."),
        ),
        (
            "cultural_context",
            array_of(
                string("A verbatim remark"),
                "Author's commentary on the dish's identity: origin, history, regional significance, family connection, what makes this version distinct, how it should be served/eaten.",
            ),
        ),
        (
            "sensory_target",
            array_of(
                string("A verbatim description"),
                "Author's descriptions of what the finished dish should taste/feel/look like.",
            ),
        ),
    ])
}

impl StructuredOutput for ExtractedRecipe {
    fn output_schema() -> OutputSchema {
        OutputSchema {
            name: "extracted_recipe".to_string(),
            description: "Faithful extraction of author-stated recipe information only. \
No inference, no enrichment, no normalization."
                .to_string(),
            schema: extracted_recipe_schema(),
        }
    }
}
