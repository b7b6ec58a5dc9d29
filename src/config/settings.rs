//! Configuration settings for ingredient-finder.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub transcription: TranscriptionSettings,
    pub cache: CacheSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory where extracted recipes are written.
    pub output_dir: String,
    /// Directory holding downloaded audio (also the audio cache).
    pub audio_dir: String,
    /// Directory for application data (SQLite cache etc.).
    pub data_dir: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            output_dir: "outputs".to_string(),
            audio_dir: "saved_audios".to_string(),
            data_dir: "~/.ingredient-finder".to_string(),
        }
    }
}

/// Chat model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model name passed to the chat completions endpoint.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Base URL of an OpenAI-compatible API. None uses the OpenAI default.
    pub api_base: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4.1-mini".to_string(),
            temperature: 0.0,
            api_base: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_seconds: 300,
        }
    }
}

/// Batch transcription service settings (Sarvam AI).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Base URL of the Sarvam API.
    pub api_base: String,
    /// Environment variable holding the subscription key.
    pub api_key_env: String,
    /// Speech model.
    pub model: String,
    /// Job mode (translate, transcribe).
    pub mode: String,
    /// Source language code, "unknown" for auto-detection.
    pub language_code: String,
    /// Request speaker diarization.
    pub with_diarization: bool,
    /// Delay between job status polls.
    pub poll_interval_seconds: u64,
    /// Give up waiting after this many seconds. 0 waits forever.
    pub max_wait_seconds: u64,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.sarvam.ai".to_string(),
            api_key_env: "SARVAM_API_KEY".to_string(),
            model: "saaras:v3".to_string(),
            mode: "translate".to_string(),
            language_code: "unknown".to_string(),
            with_diarization: false,
            poll_interval_seconds: 5,
            max_wait_seconds: 0,
        }
    }
}

/// Transcript cache backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// One file per entry, written atomically.
    #[default]
    File,
    /// Single SQLite database.
    Sqlite,
    /// Process-local, nothing persisted.
    Memory,
}

/// Transcript cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub backend: CacheBackend,
    /// Directory for the file backend.
    pub transcription_dir: String,
    /// Database path for the sqlite backend. Defaults to `{data_dir}/cache.db`.
    pub sqlite_path: Option<String>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackend::File,
            transcription_dir: "transcription/sarvam_outputs".to_string(),
            sqlite_path: None,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::RecipeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ingredient-finder")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }

    pub fn audio_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.audio_dir)
    }

    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    pub fn transcription_cache_dir(&self) -> PathBuf {
        Self::expand_path(&self.cache.transcription_dir)
    }

    pub fn sqlite_path(&self) -> PathBuf {
        match &self.cache.sqlite_path {
            Some(path) => Self::expand_path(path),
            None => self.data_dir().join("cache.db"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directory_layout() {
        let settings = Settings::default();
        assert_eq!(settings.general.output_dir, "outputs");
        assert_eq!(settings.general.audio_dir, "saved_audios");
        assert_eq!(settings.cache.transcription_dir, "transcription/sarvam_outputs");
        assert_eq!(settings.cache.backend, CacheBackend::File);
        assert_eq!(settings.transcription.max_wait_seconds, 0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_str = r#"
            [llm]
            model = "gemini-2.5-flash"
            api_base = "https://generativelanguage.googleapis.com/v1beta/openai"

            [cache]
            backend = "sqlite"
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.llm.model, "gemini-2.5-flash");
        assert!(settings.llm.api_base.is_some());
        assert_eq!(settings.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(settings.cache.backend, CacheBackend::Sqlite);
        assert_eq!(settings.transcription.model, "saaras:v3");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.transcription.poll_interval_seconds = 2;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.transcription.poll_interval_seconds, 2);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.llm.timeout_seconds, 300);
    }

    #[test]
    fn test_sqlite_path_follows_data_dir() {
        let mut settings = Settings::default();
        settings.general.data_dir = "/var/lib/ingredient-finder".to_string();
        assert_eq!(
            settings.sqlite_path(),
            PathBuf::from("/var/lib/ingredient-finder/cache.db")
        );

        settings.cache.sqlite_path = Some("/tmp/transcripts.db".to_string());
        assert_eq!(settings.sqlite_path(), PathBuf::from("/tmp/transcripts.db"));
    }
}
