//! Prompt system for Grounded.
//!
//! This crate provides:
//! - Built-in prompt definitions for grounded answering and evaluation
//! - Workspace overrides loaded from `.grounded/prompts/<id>.yml`
//! - Handlebars template rendering into system/user messages

pub mod builder;
pub mod defaults;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use defaults::{
    builtin_prompt, ANSWER_PROMPT_ID, FAITHFULNESS_PROMPT_ID, REFUSAL_ANSWER, RELEVANCE_PROMPT_ID,
};
pub use loader::{list_prompts, load_prompt};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
