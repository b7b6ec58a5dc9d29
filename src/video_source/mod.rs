//! Video metadata sources.

mod youtube;

pub use youtube::YoutubeSource;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata about a cooking video. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Platform video ID.
    pub id: String,
    /// Canonical watch URL.
    pub url: String,
    pub title: String,
    /// Empty when the video has no description.
    #[serde(default)]
    pub description: String,
    /// Declared audio language, e.g. "ta" or "en".
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Trait for services that resolve a video URL to its metadata.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata>;
}
