//! Pipeline orchestrator.
//!
//! Builds every component from settings, fetches video metadata, runs the
//! workflow and writes the result file.

use crate::audio::{sanitize_filename, AudioDownloader, YtDlpBackend};
use crate::cache::create_cache;
use crate::config::{Prompts, Settings};
use crate::error::Result;
use crate::llm::{ChatModel, OpenAIChatModel};
use crate::transcription::{CachedTranscriber, SarvamClient, ToolRegistry, Transcriber};
use crate::video_source::{MetadataFetcher, YoutubeSource};
use crate::workflow::{Workflow, WorkflowState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for the extraction pipeline.
pub struct Orchestrator {
    settings: Settings,
    fetcher: Arc<dyn MetadataFetcher>,
    workflow: Workflow,
}

impl Orchestrator {
    /// Create an orchestrator with the default components.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let model: Arc<dyn ChatModel> = Arc::new(OpenAIChatModel::new(&settings.llm)?);
        info!("Using model {}", model.model_name());

        let cache = create_cache(&settings)?;
        info!("Using {} transcription cache", cache.name());

        let sarvam: Arc<dyn Transcriber> = Arc::new(SarvamClient::new(&settings.transcription)?);
        let transcriber: Arc<dyn Transcriber> = Arc::new(CachedTranscriber::new(sarvam, cache));

        let downloader = AudioDownloader::new(Arc::new(YtDlpBackend::new()), settings.audio_dir());
        let fetcher: Arc<dyn MetadataFetcher> = Arc::new(YoutubeSource::new()?);

        Ok(Self::with_components(
            settings,
            fetcher,
            Workflow::new(model, prompts, downloader, ToolRegistry::with_all(transcriber)),
        ))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        fetcher: Arc<dyn MetadataFetcher>,
        workflow: Workflow,
    ) -> Self {
        Self {
            settings,
            fetcher,
            workflow,
        }
    }

    /// Fetch metadata and run the workflow for one video.
    #[instrument(skip(self))]
    pub async fn process_video(&self, url: &str) -> Result<WorkflowState> {
        let metadata = self.fetcher.fetch_metadata(url).await?;
        info!("Processing '{}'", metadata.title);

        let state = WorkflowState::new(metadata.url.clone(), metadata);
        self.workflow.run(state).await
    }

    /// Write the final state to `{output_dir}/{sanitised title}.json`.
    pub fn save_result(&self, state: &WorkflowState, output_dir: Option<&Path>) -> Result<PathBuf> {
        let dir = output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.settings.output_dir());
        std::fs::create_dir_all(&dir)?;

        let path = dir.join(format!(
            "{}.json",
            sanitize_filename(&state.video_metadata.title)
        ));
        std::fs::write(&path, serde_json::to_string_pretty(state)?)?;

        info!("Wrote result to {:?}", path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingTranscriber, FakeAudioBackend, ScriptedModel};
    use crate::video_source::VideoMetadata;
    use async_trait::async_trait;

    struct StaticFetcher(VideoMetadata);

    #[async_trait]
    impl MetadataFetcher for StaticFetcher {
        async fn fetch_metadata(&self, _url: &str) -> Result<VideoMetadata> {
            Ok(self.0.clone())
        }
    }

    const RECIPE: &str = r#"{
        "id": "rava-kesari", "title": "Rava Kesari",
        "metadata": {"cuisine": null, "region_notes": null, "servings": "serves 4", "total_time": null},
        "steps": [{"step": 1, "title": "Roast", "instruction": "Roast rava in ghee", "duration": null,
                   "is_passive": false, "ingredients": [], "sensory_checkpoint": "until aromatic",
                   "author_tips": [], "common_mistakes": [], "equipment": []}],
        "substitutions": [], "cultural_context": [], "sensory_target": []
    }"#;

    #[tokio::test]
    async fn test_process_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(
            ScriptedModel::new()
                .with_structured(r#"{"has_ingredients": true}"#)
                .with_completion("1 cup rava, roast in ghee")
                .with_structured(RECIPE),
        );
        let workflow = Workflow::new(
            model,
            Prompts::default(),
            AudioDownloader::new(Arc::new(FakeAudioBackend::new()), dir.path().join("audio")),
            ToolRegistry::with_all(Arc::new(CountingTranscriber::new("unused"))),
        );
        let fetcher = Arc::new(StaticFetcher(VideoMetadata {
            id: "abcdefghijk".to_string(),
            url: "https://www.youtube.com/watch?v=abcdefghijk".to_string(),
            title: "Rava Kesari / Sweet".to_string(),
            description: "Ingredients: 1 cup rava".to_string(),
            language: None,
            tags: vec![],
        }));

        let orchestrator = Orchestrator::with_components(Settings::default(), fetcher, workflow);
        let state = orchestrator
            .process_video("https://youtu.be/abcdefghijk")
            .await
            .unwrap();
        assert_eq!(state.video_url, "https://www.youtube.com/watch?v=abcdefghijk");

        let out = orchestrator
            .save_result(&state, Some(&dir.path().join("outputs")))
            .unwrap();
        assert_eq!(out, dir.path().join("outputs").join("Rava Kesari _ Sweet.json"));

        let written: WorkflowState =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written, state);
    }

    #[test]
    fn test_save_long_non_ascii_title() {
        let dir = tempfile::tempdir().unwrap();
        let workflow = Workflow::new(
            Arc::new(ScriptedModel::new()),
            Prompts::default(),
            AudioDownloader::new(Arc::new(FakeAudioBackend::new()), dir.path().join("audio")),
            ToolRegistry::with_all(Arc::new(CountingTranscriber::new("unused"))),
        );
        let title: String = "सांभर रेसिपी ".chars().cycle().take(120).collect();
        let metadata = VideoMetadata {
            id: "abcdefghijk".to_string(),
            url: "https://www.youtube.com/watch?v=abcdefghijk".to_string(),
            title,
            description: String::new(),
            language: Some("hi".to_string()),
            tags: vec![],
        };
        let orchestrator = Orchestrator::with_components(
            Settings::default(),
            Arc::new(StaticFetcher(metadata.clone())),
            workflow,
        );

        let state = WorkflowState::new(metadata.url.clone(), metadata);
        let out = orchestrator.save_result(&state, Some(dir.path())).unwrap();
        assert!(out.exists());
    }
}
