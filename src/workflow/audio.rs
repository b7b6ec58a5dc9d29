//! Recipe text from the video's audio.

use super::state::{StateUpdate, WorkflowState};
use super::NodeName;
use crate::audio::AudioDownloader;
use crate::config::Prompts;
use crate::error::Result;
use crate::llm::ChatModel;
use crate::transcription::{parse_selection, ToolRegistry};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Download, transcribe with a model-chosen tool, then trim the transcript.
#[instrument(skip_all, fields(title = %state.video_metadata.title))]
pub async fn fetch_recipe_from_audio(
    model: &dyn ChatModel,
    prompts: &Prompts,
    downloader: &AudioDownloader,
    tools: &ToolRegistry,
    state: &WorkflowState,
) -> Result<StateUpdate> {
    let metadata = &state.video_metadata;
    let audio_path = downloader.download(&state.video_url, &metadata.title).await?;

    let mut update = StateUpdate::default();

    let vars = HashMap::from([
        ("tags".to_string(), format!("{:?}", metadata.tags)),
        (
            "language".to_string(),
            metadata.language.clone().unwrap_or_else(|| "unknown".to_string()),
        ),
        ("audio_path".to_string(), audio_path.display().to_string()),
    ]);
    let prompt = prompts.build(&prompts.tool_selection, &vars);

    let selections = model.select_tools(&prompt, &tools.definitions()).await?;
    let names: Vec<&str> = selections.iter().map(|s| s.name.as_str()).collect();
    update.record(NodeName::FetchRecipeFromAudio, prompt, names.join(", "));

    let (tool, args) = parse_selection(&selections, &metadata.tags)?;

    // Only the downloaded file is ever transcribed.
    if args.audio_path != audio_path {
        warn!(
            "Model asked for {:?}; transcribing downloaded {:?}",
            args.audio_path, audio_path
        );
    }

    let transcription = tools.invoke(tool, &audio_path).await?;
    info!(
        "Transcribed with {} ({} chars)",
        tool,
        transcription.text.len()
    );

    let vars = HashMap::from([("transcript".to_string(), transcription.text.clone())]);
    let prompt = prompts.build(&prompts.transcript_trim, &vars);
    let trimmed = model.complete(&prompt).await?;
    update.record(NodeName::FetchRecipeFromAudio, prompt, trimmed.clone());

    update.recipe_details.recipe_raw_text = Some(trimmed);
    update.recipe_details.transcription_tool = Some(tool);
    update.recipe_details.transcript = Some(transcription.text);
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecipeError;
    use crate::testing::{tool_call, CountingTranscriber, FakeAudioBackend, ScriptedModel};
    use crate::transcription::TranscriptionTool;
    use crate::video_source::VideoMetadata;
    use std::sync::Arc;

    fn state() -> WorkflowState {
        WorkflowState::new(
            "https://www.youtube.com/watch?v=3Hn6iwieyX4",
            VideoMetadata {
                id: "3Hn6iwieyX4".to_string(),
                url: "https://www.youtube.com/watch?v=3Hn6iwieyX4".to_string(),
                title: "Ambur Biryani".to_string(),
                description: "Like and subscribe".to_string(),
                language: Some("ta".to_string()),
                tags: vec!["biryani".to_string(), "tamil".to_string()],
            },
        )
    }

    #[tokio::test]
    async fn test_transcribes_with_selected_tool() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = AudioDownloader::new(Arc::new(FakeAudioBackend::new()), dir.path());
        let audio_path = downloader.cached_path("Ambur Biryani");

        let transcriber = Arc::new(CountingTranscriber::new("Vanakkam! Soak seeraga samba rice"));
        let tools = ToolRegistry::with_all(transcriber.clone());

        let model = ScriptedModel::new()
            .with_selection(vec![tool_call("transcribe_audio_indian", &audio_path)])
            .with_completion("Soak seeraga samba rice");

        let update = fetch_recipe_from_audio(&model, &Prompts::default(), &downloader, &tools, &state())
            .await
            .unwrap();

        let details = &update.recipe_details;
        assert_eq!(details.recipe_raw_text.as_deref(), Some("Soak seeraga samba rice"));
        assert_eq!(details.transcription_tool, Some(TranscriptionTool::IndianLanguage));
        assert_eq!(details.transcript.as_deref(), Some("Vanakkam! Soak seeraga samba rice"));
        assert_eq!(update.llm_calls, 2);
        assert_eq!(transcriber.calls(), 1);

        let prompts = model.prompts();
        assert!(prompts[0].user.contains("tamil"));
        assert!(prompts[0].user.contains("Ambur Biryani.mp3"));
        assert_eq!(
            model.tools_offered(),
            vec!["transcribe_audio_indian", "transcribe_audio_english"]
        );
    }

    #[tokio::test]
    async fn test_no_selection_fails_without_transcribing() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = AudioDownloader::new(Arc::new(FakeAudioBackend::new()), dir.path());
        let transcriber = Arc::new(CountingTranscriber::new("unused"));
        let tools = ToolRegistry::with_all(transcriber.clone());
        let model = ScriptedModel::new().with_selection(vec![]);

        let err = fetch_recipe_from_audio(&model, &Prompts::default(), &downloader, &tools, &state())
            .await
            .unwrap_err();

        match err {
            RecipeError::NoToolSelected { tags } => assert_eq!(tags, vec!["biryani", "tamil"]),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(transcriber.calls(), 0);
    }

    #[tokio::test]
    async fn test_model_path_is_not_trusted() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = AudioDownloader::new(Arc::new(FakeAudioBackend::new()), dir.path());
        let transcriber = Arc::new(CountingTranscriber::new("Add ghee"));
        let tools = ToolRegistry::with_all(transcriber.clone());

        let model = ScriptedModel::new()
            .with_selection(vec![tool_call(
                "transcribe_audio_english",
                std::path::Path::new("/etc/passwd"),
            )])
            .with_completion("Add ghee");

        let update = fetch_recipe_from_audio(&model, &Prompts::default(), &downloader, &tools, &state())
            .await
            .unwrap();

        assert_eq!(update.recipe_details.transcript.as_deref(), Some("Add ghee"));
        assert_eq!(transcriber.calls(), 1);
    }
}
