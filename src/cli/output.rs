//! CLI output formatting utilities.

use crate::recipe::ExtractedRecipe;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print a short summary of an extracted recipe.
    pub fn recipe_summary(recipe: &ExtractedRecipe) {
        Self::header(&recipe.title);
        if let Some(cuisine) = &recipe.metadata.cuisine {
            Self::kv("Cuisine", cuisine);
        }
        if let Some(servings) = &recipe.metadata.servings {
            Self::kv("Servings", servings);
        }
        if let Some(total_time) = &recipe.metadata.total_time {
            Self::kv("Time", total_time);
        }
        Self::kv("Steps", &recipe.step_count().to_string());

        println!();
        println!("{}", style("Ingredients").bold());
        for ingredient in recipe.ingredients() {
            match &ingredient.quantity {
                Some(qty) => Self::list_item(&format!("{} {}", style(qty).dim(), ingredient.name)),
                None => Self::list_item(&ingredient.name),
            }
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}
