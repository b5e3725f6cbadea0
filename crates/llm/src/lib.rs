//! Generation backend crate for Grounded.
//!
//! Provides a provider-agnostic chat-completion abstraction. The answer
//! engine only needs "send these role-tagged messages, get text back", so
//! that is the whole contract.
//!
//! # Providers
//! - **Ollama**: local LLM runtime (default)
//! - **OpenAI**: any OpenAI-compatible `/v1/chat/completions` endpoint
//!
//! # Example
//! ```no_run
//! use grounded_llm::{ChatMessage, LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new()?;
//! let request = LlmRequest::new(vec![ChatMessage::user("Hello, world!")], "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, LlmUsage, Role};
pub use factory::create_client;
pub use providers::{OllamaClient, OpenAiClient, DEFAULT_TIMEOUT_SECS};
pub use types::ProviderType;
