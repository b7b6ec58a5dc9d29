//! In-crate fakes for tests.

use crate::audio::AudioBackend;
use crate::error::{RecipeError, Result};
use crate::llm::{ChatModel, OutputSchema, Prompt, ToolDefinition, ToolSelection};
use crate::transcription::{Transcriber, Transcription};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Chat model that replays scripted responses in order.
#[derive(Default)]
pub struct ScriptedModel {
    completions: Mutex<VecDeque<String>>,
    structured: Mutex<VecDeque<String>>,
    selections: Mutex<VecDeque<Vec<ToolSelection>>>,
    prompts: Mutex<Vec<Prompt>>,
    tools_offered: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_completion(self, text: &str) -> Self {
        self.completions.lock().unwrap().push_back(text.to_string());
        self
    }

    pub fn with_structured(self, json: &str) -> Self {
        self.structured.lock().unwrap().push_back(json.to_string());
        self
    }

    pub fn with_selection(self, selections: Vec<ToolSelection>) -> Self {
        self.selections.lock().unwrap().push_back(selections);
        self
    }

    /// Every prompt the model received, in order.
    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn tools_offered(&self) -> Vec<String> {
        self.tools_offered.lock().unwrap().clone()
    }

    fn record(&self, prompt: &Prompt) {
        self.prompts.lock().unwrap().push(prompt.clone());
    }
}

fn exhausted(kind: &str) -> RecipeError {
    RecipeError::Llm(format!("no scripted {} response left", kind))
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        self.record(prompt);
        self.completions
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| exhausted("completion"))
    }

    async fn complete_structured(&self, prompt: &Prompt, _schema: &OutputSchema) -> Result<String> {
        self.record(prompt);
        self.structured
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| exhausted("structured"))
    }

    async fn select_tools(
        &self,
        prompt: &Prompt,
        tools: &[ToolDefinition],
    ) -> Result<Vec<ToolSelection>> {
        self.record(prompt);
        self.tools_offered
            .lock()
            .unwrap()
            .extend(tools.iter().map(|t| t.name.clone()));
        self.selections
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| exhausted("tool selection"))
    }
}

/// Audio backend that writes a placeholder MP3 and counts calls.
#[derive(Default)]
pub struct FakeAudioBackend {
    calls: AtomicUsize,
    fail: bool,
}

impl FakeAudioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaves a half-written file behind, then fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioBackend for FakeAudioBackend {
    async fn fetch_mp3(&self, _url: &str, dir: &Path, stem: &str) -> Result<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            std::fs::write(dir.join(format!("{}.webm", stem)), b"partial")?;
            return Err(RecipeError::AudioDownload("connection reset".to_string()));
        }
        let path = dir.join(format!("{}.mp3", stem));
        std::fs::write(&path, b"ID3 fake audio")?;
        Ok(path)
    }
}

/// Transcriber returning a fixed output document and counting calls.
pub struct CountingTranscriber {
    output: String,
    calls: AtomicUsize,
}

impl CountingTranscriber {
    /// Service output carrying `text` as its transcript.
    pub fn new(text: &str) -> Self {
        Self::with_output(
            &serde_json::json!({ "transcript": text, "language_code": "en-IN" }).to_string(),
        )
    }

    pub fn with_output(output: &str) -> Self {
        Self {
            output: output.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcriber for CountingTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> Result<Transcription> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Transcription::from_output(&self.output))
    }
}

/// A tool selection as the model would return it.
pub fn tool_call(name: &str, audio_path: &Path) -> ToolSelection {
    ToolSelection {
        id: "call_1".to_string(),
        name: name.to_string(),
        arguments: serde_json::json!({ "audio_path": audio_path }).to_string(),
    }
}
