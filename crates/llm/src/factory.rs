//! Generation provider factory.
//!
//! Resolves a provider name into a concrete client, injecting the endpoint
//! and secrets resolved from configuration.

use crate::client::LlmClient;
use crate::providers::{OllamaClient, OpenAiClient, DEFAULT_TIMEOUT_SECS};
use crate::types::ProviderType;
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama", "openai")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (required by "openai")
/// * `timeout_secs` - Optional request timeout, defaults to [`DEFAULT_TIMEOUT_SECS`]
///
/// # Errors
/// Returns error if the provider is unknown, a required secret is missing
/// or the HTTP client cannot be built.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout_secs: Option<u64>,
) -> Result<Arc<dyn LlmClient>, String> {
    let timeout = Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));

    match ProviderType::parse(provider) {
        Some(ProviderType::Ollama) => {
            let base_url = endpoint.unwrap_or(OllamaClient::DEFAULT_BASE_URL);
            let client = OllamaClient::with_timeout(base_url, timeout).map_err(|e| e.to_string())?;
            Ok(Arc::new(client))
        }
        Some(ProviderType::OpenAI) => {
            let api_key = api_key.ok_or_else(|| "OpenAI provider requires API key".to_string())?;
            let base_url = endpoint.unwrap_or(OpenAiClient::DEFAULT_BASE_URL);
            let client =
                OpenAiClient::with_timeout(base_url, api_key, timeout).map_err(|e| e.to_string())?;
            Ok(Arc::new(client))
        }
        None => Err(format!("Unknown provider: {}", provider)),
    }
}
