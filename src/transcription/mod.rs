//! Audio transcription.
//!
//! [`SarvamClient`] runs a batch speech-to-text/translate job against the
//! Sarvam AI REST API. [`CachedTranscriber`] wraps any [`Transcriber`] so a
//! file is only ever sent once. [`ToolRegistry`] maps the transcription tools
//! a model may select onto transcribers.

mod cached;
mod sarvam;
mod tools;

pub use cached::CachedTranscriber;
pub use sarvam::SarvamClient;
pub use tools::{parse_selection, ToolRegistry, TranscribeArgs, TranscriptionTool};

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Text recognised from an audio file.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub text: String,
    /// Language the service detected in the source audio.
    pub language_code: Option<String>,
    /// The service output document exactly as received, including fields
    /// such as diarized segments that `text` does not carry.
    pub raw: String,
}

impl Transcription {
    /// Parse a transcription service output document.
    ///
    /// JSON documents are read for `transcript` (or `text`) and
    /// `language_code`; anything else is taken verbatim as the text.
    pub fn from_output(raw: &str) -> Self {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(raw) {
            let text = json["transcript"]
                .as_str()
                .or_else(|| json["text"].as_str());

            if let Some(text) = text {
                return Self {
                    text: text.to_string(),
                    language_code: json["language_code"].as_str().map(|s| s.to_string()),
                    raw: raw.to_string(),
                };
            }
        }

        Self {
            text: raw.to_string(),
            language_code: None,
            raw: raw.to_string(),
        }
    }
}

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file, translated to English where the service does so.
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription>;
}
