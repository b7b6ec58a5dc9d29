//! Cached audio download.
//!
//! Audio is stored as `{audio_dir}/{sanitised title}.mp3`. An existing file
//! short-circuits the download; there is no invalidation.

mod downloader;

pub use downloader::YtDlpBackend;

use crate::error::{RecipeError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Mechanism that fetches a video's audio track as MP3.
#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Download `url` into `dir`, producing `{dir}/{stem}.mp3`. Returns that path.
    async fn fetch_mp3(&self, url: &str, dir: &Path, stem: &str) -> Result<PathBuf>;
}

/// Downloads audio once per title.
pub struct AudioDownloader {
    backend: Arc<dyn AudioBackend>,
    dir: PathBuf,
}

impl AudioDownloader {
    pub fn new(backend: Arc<dyn AudioBackend>, dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            dir: dir.into(),
        }
    }

    /// Path the audio for `title` is cached at.
    pub fn cached_path(&self, title: &str) -> PathBuf {
        self.dir.join(format!("{}.mp3", sanitize_filename(title)))
    }

    /// Return the local MP3 for `title`, downloading it on first use.
    #[instrument(skip(self))]
    pub async fn download(&self, url: &str, title: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;

        let target = self.cached_path(title);
        if target.exists() {
            info!("Using cached audio for '{}'", title);
            return Ok(target);
        }

        // Download under a private stem so a half-finished file never sits at the cache path.
        let stem = format!(".{}.{}.partial", sanitize_filename(title), std::process::id());
        let result = match self.backend.fetch_mp3(url, &self.dir, &stem).await {
            Ok(downloaded) => std::fs::rename(&downloaded, &target).map_err(RecipeError::from),
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            remove_partials(&self.dir, &stem);
            return Err(e);
        }

        info!("Saved audio to {:?}", target);
        Ok(target)
    }
}

/// Delete every file a failed download left under `stem`.
fn remove_partials(dir: &Path, stem: &str) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        if entry.file_name().to_string_lossy().starts_with(stem) {
            match std::fs::remove_file(entry.path()) {
                Ok(()) => debug!("Removed partial download {:?}", entry.path()),
                Err(e) => warn!("Failed to remove {:?}: {}", entry.path(), e),
            }
        }
    }
}

/// Longest sanitised name in bytes. Leaves room under the usual 255-byte
/// file name limit for the `.{pid}.partial.mp3` download stem and the
/// `.mp3.json` transcription cache key.
const MAX_NAME_BYTES: usize = 200;

/// Make a video title safe to use as a file name.
///
/// Path separators, characters reserved by common filesystems or by yt-dlp
/// output templates, and control characters become `_`;
/// surrounding whitespace and dots are trimmed; the result is capped at
/// [`MAX_NAME_BYTES`] bytes on a character boundary. An empty result becomes
/// `untitled`.
pub fn sanitize_filename(title: &str) -> String {
    let mut cleaned = String::new();
    for c in title.chars() {
        let c = match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '%' => '_',
            c if c.is_control() => '_',
            c => c,
        };
        if cleaned.len() + c.len_utf8() > MAX_NAME_BYTES {
            break;
        }
        cleaned.push(c);
    }

    let trimmed = cleaned.trim().trim_matches('.').trim();
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}
