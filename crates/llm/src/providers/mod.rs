//! Generation provider implementations.

pub mod ollama;
pub mod openai;

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

use grounded_core::{AppError, AppResult};
use std::time::Duration;

/// Per-request timeout used when the provider config sets none.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// HTTP client with a whole-request timeout.
pub(crate) fn http_client(timeout: Duration) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Llm(format!("Failed to create HTTP client: {}", e)))
}
