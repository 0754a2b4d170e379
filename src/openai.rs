//! Client configuration for the hosted, OpenAI-compatible model API.

use crate::config::LlmSettings;
use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create a client for the configured API base with the given key.
///
/// Uses the configured timeout (5 minutes by default) to prevent hung API calls.
pub fn create_client(settings: &LlmSettings, api_key: &str) -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(
        &settings.api_base,
        api_key,
        Duration::from_secs(settings.timeout_secs),
    )
}

/// Create a client against an explicit API base with a custom timeout.
pub fn create_client_with_timeout(
    api_base: &str,
    api_key: &str,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    // Request paths start with '/', so the base must not end with one.
    let config = OpenAIConfig::new()
        .with_api_base(api_base.trim_end_matches('/'))
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client))
}
