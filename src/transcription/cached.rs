//! Caching decorator for transcribers.

use super::{Transcriber, Transcription};
use crate::cache::Cache;
use crate::error::{RecipeError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Transcriber that consults a cache keyed by the audio file name.
///
/// Entries live under `{audio_filename}.json` and hold the service output
/// document verbatim; it is parsed again on every hit. A hit never touches
/// the inner transcriber.
pub struct CachedTranscriber {
    inner: Arc<dyn Transcriber>,
    cache: Arc<dyn Cache>,
}

impl CachedTranscriber {
    pub fn new(inner: Arc<dyn Transcriber>, cache: Arc<dyn Cache>) -> Self {
        Self { inner, cache }
    }

    /// Cache key for an audio file.
    pub fn cache_key(audio_path: &Path) -> Result<String> {
        audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| format!("{}.json", n))
            .ok_or_else(|| {
                RecipeError::InvalidInput(format!("Not an audio file path: {:?}", audio_path))
            })
    }
}

#[async_trait]
impl Transcriber for CachedTranscriber {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription> {
        let key = Self::cache_key(audio_path)?;

        if let Some(cached) = self.cache.get(&key).await? {
            info!("Using cached transcription for {}", key);
            return Ok(Transcription::from_output(&cached));
        }

        let transcription = self.inner.transcribe(audio_path).await?;

        self.cache.put(&key, &transcription.raw).await?;
        debug!("Cached transcription in {} cache", self.cache.name());

        Ok(transcription)
    }
}
