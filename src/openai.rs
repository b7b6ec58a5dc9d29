//! OpenAI client configuration.

use crate::config::LlmSettings;
use crate::error::{RecipeError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create an OpenAI-compatible client from settings.
///
/// The API key is read from `settings.api_key_env`; a custom `api_base`
/// points the client at any OpenAI-compatible provider.
pub fn create_client(settings: &LlmSettings) -> Result<Client<OpenAIConfig>> {
    let mut config = OpenAIConfig::new();

    if let Some(base) = settings.api_base.as_deref().filter(|b| !b.is_empty()) {
        config = config.with_api_base(base.trim_end_matches('/'));
    }

    if let Ok(key) = std::env::var(&settings.api_key_env) {
        config = config.with_api_key(key);
    }

    create_client_with_config(config, Duration::from_secs(settings.timeout_seconds))
}

/// Create a client from an explicit config with a request timeout.
pub fn create_client_with_config(
    config: OpenAIConfig,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RecipeError::Config(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Client::with_config(config).with_http_client(http_client))
}
