//! Sarvam AI batch transcription client.
//!
//! A batch job is driven in five calls: create the job, request a presigned
//! upload URL and PUT the audio there, start the job, poll its status until it
//! reaches a terminal state, then request a presigned download URL for the
//! output document. Batch jobs accept audio up to an hour long.

use super::{Transcriber, Transcription};
use crate::config::TranscriptionSettings;
use crate::error::{RecipeError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

const API_KEY_HEADER: &str = "api-subscription-key";

#[derive(Debug, Deserialize)]
struct JobCreated {
    job_id: String,
}

#[derive(Debug, Serialize)]
struct FilesRequest<'a> {
    job_id: &'a str,
    files: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FileUrl {
    file_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadUrls {
    upload_urls: HashMap<String, FileUrl>,
}

#[derive(Debug, Deserialize)]
struct DownloadUrls {
    download_urls: HashMap<String, FileUrl>,
}

#[derive(Debug, Serialize)]
struct JobParameters<'a> {
    model: &'a str,
    mode: &'a str,
    language_code: &'a str,
    with_diarization: bool,
}

#[derive(Debug, Serialize)]
struct StartRequest<'a> {
    job_id: &'a str,
    job_parameters: JobParameters<'a>,
}

#[derive(Debug, Deserialize)]
struct FileRef {
    file_name: String,
}

#[derive(Debug, Deserialize)]
struct JobDetail {
    #[serde(default)]
    inputs: Vec<FileRef>,
    #[serde(default)]
    outputs: Vec<FileRef>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobStatus {
    job_state: String,
    #[serde(default)]
    job_details: Vec<JobDetail>,
    #[serde(default)]
    error_message: Option<String>,
}

impl JobStatus {
    fn is_terminal(&self) -> bool {
        self.job_state.eq_ignore_ascii_case("completed")
            || self.job_state.eq_ignore_ascii_case("failed")
    }

    /// Output documents of files that were processed successfully.
    fn successful_outputs(&self) -> Vec<String> {
        self.job_details
            .iter()
            .filter(|d| {
                d.state
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case("success"))
            })
            .filter_map(|d| {
                d.outputs
                    .first()
                    .map(|o| o.file_name.clone())
                    .or_else(|| d.inputs.first().map(|i| format!("{}.json", i.file_name)))
            })
            .collect()
    }
}

/// Batch speech-to-text client for the Sarvam AI API.
pub struct SarvamClient {
    http: reqwest::Client,
    api_base: String,
    api_key_env: String,
    api_key: Option<String>,
    model: String,
    mode: String,
    language_code: String,
    with_diarization: bool,
    poll_interval: Duration,
    max_wait: Option<Duration>,
}

impl SarvamClient {
    /// Create a client from settings.
    ///
    /// The API key is not read here; it is looked up from the environment on
    /// the first transcription so cached runs need no key.
    pub fn new(settings: &TranscriptionSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| RecipeError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            api_key_env: settings.api_key_env.clone(),
            api_key: None,
            model: settings.model.clone(),
            mode: settings.mode.clone(),
            language_code: settings.language_code.clone(),
            with_diarization: settings.with_diarization,
            poll_interval: Duration::from_secs(settings.poll_interval_seconds.max(1)),
            max_wait: (settings.max_wait_seconds > 0)
                .then(|| Duration::from_secs(settings.max_wait_seconds)),
        })
    }

    /// Use an explicit API key instead of the environment.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        std::env::var(&self.api_key_env)
            .map_err(|_| RecipeError::Config(format!("{} is not set", self.api_key_env)))
    }

    // saaras models translate; saarika models transcribe only.
    fn job_url(&self, suffix: &str) -> String {
        let service = if self.model.starts_with("saarika") {
            "speech-to-text"
        } else {
            "speech-to-text-translate"
        };
        format!("{}/{}/job/v1{}", self.api_base, service, suffix)
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        key: &str,
        url: &str,
        body: &B,
    ) -> Result<R> {
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RecipeError::Transcription(format!(
                "{} returned {}: {}",
                url, status, text
            )));
        }

        Ok(response.json::<R>().await?)
    }

    async fn create_job(&self, key: &str) -> Result<String> {
        let created: JobCreated = self
            .post_json(key, &self.job_url("/init"), &serde_json::json!({}))
            .await?;
        debug!("Created batch job {}", created.job_id);
        Ok(created.job_id)
    }

    async fn upload(&self, key: &str, job_id: &str, audio_path: &Path, file_name: &str) -> Result<()> {
        let urls: UploadUrls = self
            .post_json(
                key,
                &self.job_url("/upload-files"),
                &FilesRequest {
                    job_id,
                    files: vec![file_name.to_string()],
                },
            )
            .await?;

        let target = urls.upload_urls.get(file_name).ok_or_else(|| {
            RecipeError::Transcription(format!("No upload URL returned for {}", file_name))
        })?;

        let bytes = tokio::fs::read(audio_path).await?;
        debug!("Uploading {} bytes", bytes.len());

        let response = self
            .http
            .put(&target.file_url)
            .header("x-ms-blob-type", "BlockBlob")
            .header("content-type", "audio/mpeg")
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RecipeError::Transcription(format!(
                "Upload of {} failed with {}",
                file_name,
                response.status()
            )));
        }
        Ok(())
    }

    async fn start(&self, key: &str, job_id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post_json(
                key,
                &self.job_url(""),
                &StartRequest {
                    job_id,
                    job_parameters: JobParameters {
                        model: &self.model,
                        mode: &self.mode,
                        language_code: &self.language_code,
                        with_diarization: self.with_diarization,
                    },
                },
            )
            .await?;
        Ok(())
    }

    async fn wait_until_complete(&self, key: &str, job_id: &str) -> Result<JobStatus> {
        let started = Instant::now();
        let url = self.job_url(&format!("/{}/status", job_id));

        loop {
            let response = self
                .http
                .get(&url)
                .header(API_KEY_HEADER, key)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(RecipeError::Transcription(format!(
                    "Status check failed with {}",
                    response.status()
                )));
            }

            let status: JobStatus = response.json().await?;
            debug!("Job {} state: {}", job_id, status.job_state);

            if status.is_terminal() {
                return Ok(status);
            }

            if let Some(max_wait) = self.max_wait {
                if started.elapsed() >= max_wait {
                    return Err(RecipeError::Transcription(format!(
                        "Job {} still {} after {}s",
                        job_id,
                        status.job_state,
                        max_wait.as_secs()
                    )));
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn download_output(&self, key: &str, job_id: &str, output_name: &str) -> Result<String> {
        let urls: DownloadUrls = self
            .post_json(
                key,
                &self.job_url("/download-files"),
                &FilesRequest {
                    job_id,
                    files: vec![output_name.to_string()],
                },
            )
            .await?;

        let source = urls.download_urls.get(output_name).ok_or_else(|| {
            RecipeError::Transcription(format!("No download URL returned for {}", output_name))
        })?;

        let response = self.http.get(&source.file_url).send().await?;
        if !response.status().is_success() {
            return Err(RecipeError::Transcription(format!(
                "Download of {} failed with {}",
                output_name,
                response.status()
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl Transcriber for SarvamClient {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcription> {
        let key = self.api_key()?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                RecipeError::InvalidInput(format!("Not an audio file path: {:?}", audio_path))
            })?
            .to_string();

        info!("Submitting {} for batch transcription", file_name);

        let job_id = self.create_job(&key).await?;
        self.upload(&key, &job_id, audio_path, &file_name).await?;
        self.start(&key, &job_id).await?;

        let status = self.wait_until_complete(&key, &job_id).await?;

        for detail in &status.job_details {
            if let Some(err) = &detail.error_message {
                warn!("File in job {} failed: {}", job_id, err);
            }
        }

        let outputs = status.successful_outputs();
        let Some(output_name) = outputs.first() else {
            if let Some(err) = &status.error_message {
                warn!("Job {} failed: {}", job_id, err);
            }
            return Err(RecipeError::TranscriptionJobFailed);
        };

        let raw = self.download_output(&key, &job_id, output_name).await?;
        let transcription = Transcription::from_output(&raw);

        info!(
            "Transcribed {} ({} chars)",
            file_name,
            transcription.text.len()
        );
        Ok(transcription)
    }
}
