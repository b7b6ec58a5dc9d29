//! Workflow runner.
//!
//! The graph is fixed: decide source, then description or audio extraction,
//! then structuring. There are no loops and no retries.

use super::audio::fetch_recipe_from_audio;
use super::decision::{decide_source, Route};
use super::description::fetch_recipe_from_description;
use super::state::WorkflowState;
use super::structuring::format_recipe;
use super::NodeName;
use crate::audio::AudioDownloader;
use crate::config::Prompts;
use crate::error::Result;
use crate::llm::ChatModel;
use crate::transcription::ToolRegistry;
use std::sync::Arc;
use tracing::{info, instrument};

/// Runs the extraction steps in order and merges their updates.
pub struct Workflow {
    model: Arc<dyn ChatModel>,
    prompts: Prompts,
    downloader: AudioDownloader,
    tools: ToolRegistry,
}

impl Workflow {
    pub fn new(
        model: Arc<dyn ChatModel>,
        prompts: Prompts,
        downloader: AudioDownloader,
        tools: ToolRegistry,
    ) -> Self {
        Self {
            model,
            prompts,
            downloader,
            tools,
        }
    }

    /// Run the workflow to completion.
    #[instrument(skip_all, fields(url = %state.video_url))]
    pub async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState> {
        let model = self.model.as_ref();

        info!("Running {}", NodeName::DecideSource);
        let (route, update) = decide_source(model, &self.prompts, &state).await?;
        state.apply(update);

        info!("Running {}", route.node());
        let update = match route {
            Route::Description => {
                fetch_recipe_from_description(model, &self.prompts, &state).await?
            }
            Route::Audio => {
                fetch_recipe_from_audio(model, &self.prompts, &self.downloader, &self.tools, &state)
                    .await?
            }
        };
        state.apply(update);

        info!("Running {}", NodeName::FormatRecipe);
        let update = format_recipe(model, &self.prompts, &state).await?;
        state.apply(update);

        info!(
            "Workflow finished with {} LLM call(s) via {}",
            state.llm_calls,
            route.node()
        );
        Ok(state)
    }
}
