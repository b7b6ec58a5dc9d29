//! Extract command implementation.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::{Context, Result};

/// Run the extract command.
pub async fn run_extract(url: &str, output_dir: Option<String>, settings: Settings) -> Result<()> {
    match preflight::check_extract(&settings) {
        Ok(warnings) => {
            for warning in warnings {
                Output::warning(&warning);
            }
        }
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::info("Run 'ingredient-finder doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    }

    Output::info(&format!("Processing: {}", url));

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Extracting recipe (this can take a while for audio)...");
    let result = orchestrator.process_video(url).await;
    spinner.finish_and_clear();

    let state = result.with_context(|| format!("Failed to extract a recipe from {}", url))?;

    let output_dir = output_dir.map(|dir| Settings::expand_path(&dir));
    let path = orchestrator.save_result(&state, output_dir.as_deref())?;

    match &state.recipe_details.extracted_recipe {
        Some(recipe) => Output::recipe_summary(recipe),
        None => Output::warning("No recipe was extracted."),
    }

    println!();
    if let Some(tool) = state.recipe_details.transcription_tool {
        Output::kv("Source", &format!("audio ({})", tool));
    } else {
        Output::kv("Source", "description");
    }
    Output::kv("LLM calls", &state.llm_calls.to_string());
    Output::success(&format!("Saved to {}", path.display()));

    Ok(())
}
