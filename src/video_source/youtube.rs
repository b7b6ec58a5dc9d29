//! YouTube metadata via yt-dlp.

use super::{MetadataFetcher, VideoMetadata};
use crate::error::{RecipeError, Result};
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, info, instrument};

/// YouTube video source.
pub struct YoutubeSource {
    video_id_regex: Regex,
}

impl YoutubeSource {
    pub fn new() -> Result<Self> {
        // Watch, short, embed and /v/ URLs, or a bare 11-character ID
        let video_id_regex = Regex::new(
            r"(?x)
            (?:
                (?:https?://)?
                (?:www\.|m\.)?
                (?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .map_err(|e| RecipeError::Config(format!("Invalid video ID pattern: {}", e)))?;

        Ok(Self { video_id_regex })
    }

    /// Extract the video ID from a YouTube URL or bare ID.
    pub fn extract_video_id(&self, input: &str) -> Option<String> {
        let caps = self.video_id_regex.captures(input.trim())?;
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    }

    /// Canonical watch URL for a video ID.
    pub fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", video_id)
    }

    #[instrument(skip(self))]
    async fn dump_json(&self, url: &str) -> Result<String> {
        let output = tokio::process::Command::new("yt-dlp")
            .args(["--dump-json", "--no-download", "--no-warnings", "--no-playlist", url])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RecipeError::ToolNotFound("yt-dlp".to_string())
                } else {
                    RecipeError::VideoSource(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecipeError::VideoNotFound(format!(
                "{} not found or unavailable: {}",
                url,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse `yt-dlp --dump-json` output.
///
/// A missing description becomes the empty string and missing tags an empty
/// list; only the title is required.
pub(crate) fn parse_metadata(video_id: &str, json_str: &str) -> Result<VideoMetadata> {
    let json: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| RecipeError::VideoSource(format!("Failed to parse yt-dlp output: {}", e)))?;

    let title = json["title"]
        .as_str()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| RecipeError::VideoSource(format!("Video {} has no title", video_id)))?
        .to_string();

    let description = json["description"].as_str().unwrap_or_default().to_string();

    let language = json["language"]
        .as_str()
        .filter(|l| !l.is_empty())
        .map(|l| l.to_string());

    let tags = json["tags"]
        .as_array()
        .map(|tags| {
            tags.iter()
                .filter_map(|t| t.as_str())
                .map(|t| t.to_string())
                .collect()
        })
        .unwrap_or_default();

    Ok(VideoMetadata {
        id: video_id.to_string(),
        url: YoutubeSource::watch_url(video_id),
        title,
        description,
        language,
        tags,
    })
}

#[async_trait]
impl MetadataFetcher for YoutubeSource {
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata> {
        let video_id = self.extract_video_id(url).ok_or_else(|| {
            RecipeError::InvalidInput(format!("Invalid YouTube video ID or URL: {}", url))
        })?;

        let json = self.dump_json(&Self::watch_url(&video_id)).await?;
        let metadata = parse_metadata(&video_id, &json)?;

        info!("Fetched metadata for '{}'", metadata.title);
        debug!(
            "Language: {:?}, {} tag(s), description {} chars",
            metadata.language,
            metadata.tags.len(),
            metadata.description.len()
        );
        Ok(metadata)
    }
}
