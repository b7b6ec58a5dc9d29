//! yt-dlp audio backend.
//!
//! Downloads the best audio stream with yt-dlp and normalises the result to
//! MP3 with ffmpeg when yt-dlp leaves a different container behind.

use super::AudioBackend;
use crate::error::{RecipeError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Audio backend shelling out to `yt-dlp` and `ffmpeg`.
pub struct YtDlpBackend {
    audio_quality: String,
}

impl YtDlpBackend {
    pub fn new() -> Self {
        Self {
            audio_quality: "128K".to_string(),
        }
    }
}

impl Default for YtDlpBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioBackend for YtDlpBackend {
    #[instrument(skip(self, dir))]
    async fn fetch_mp3(&self, url: &str, dir: &Path, stem: &str) -> Result<PathBuf> {
        info!("Downloading audio from {}", url);

        let template = dir.join(format!("{}.%(ext)s", stem));
        let target = dir.join(format!("{}.mp3", stem));

        let result = Command::new("yt-dlp")
            .arg("--format")
            .arg("bestaudio/best")
            .arg("--extract-audio")
            .arg("--audio-format")
            .arg("mp3")
            .arg("--audio-quality")
            .arg(&self.audio_quality)
            .arg("--output")
            .arg(&template)
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RecipeError::ToolNotFound("yt-dlp".into()));
            }
            Err(e) => {
                return Err(RecipeError::AudioDownload(format!(
                    "yt-dlp execution failed: {e}"
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecipeError::AudioDownload(format!(
                "yt-dlp failed: {}",
                stderr.trim()
            )));
        }

        let downloaded = find_audio_file(dir, stem)?;

        if downloaded != target {
            normalize_to_mp3(&downloaded, &target).await?;
            let _ = std::fs::remove_file(&downloaded);
        }

        Ok(target)
    }
}

/// Locate the file yt-dlp produced for `stem`.
fn find_audio_file(dir: &Path, stem: &str) -> Result<PathBuf> {
    for ext in ["mp3", "opus", "m4a", "webm", "ogg"] {
        let candidate = dir.join(format!("{}.{}", stem, ext));
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(RecipeError::AudioDownload(format!(
        "No audio file for '{}' after download",
        stem
    )))
}

async fn normalize_to_mp3(source: &Path, dest: &Path) -> Result<()> {
    debug!("Converting {:?} to MP3", source);

    let result = Command::new("ffmpeg")
        .arg("-i")
        .arg(source)
        .arg("-vn")
        .arg("-codec:a")
        .arg("libmp3lame")
        .arg("-b:a")
        .arg("128k")
        .arg("-y")
        .arg("-loglevel")
        .arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(RecipeError::AudioDownload(format!(
                "ffmpeg conversion failed: {err}"
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(RecipeError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(RecipeError::AudioDownload(format!("ffmpeg error: {e}"))),
    }
}
