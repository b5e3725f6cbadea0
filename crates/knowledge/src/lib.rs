//! Grounded question answering over a pre-built passage index.
//!
//! Retrieval results are gated by a distance threshold before any text is
//! generated: weak or empty retrieval yields a fixed refusal, strong
//! retrieval yields an answer conditioned on the retrieved passages together
//! with citations and a calibrated confidence.

pub mod confidence;
pub mod config;
pub mod context;
pub mod embeddings;
pub mod engine;
pub mod eval;
pub mod index;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use config::{load_config, save_config, KnowledgeConfig};
pub use engine::{AnswerEngine, EngineConfig};
pub use grounded_prompt::REFUSAL_ANSWER;
pub use index::{LanceDbIndex, SimilarityIndex};
pub use types::{AnswerOptions, AnswerResult, Citation, Passage, ScoredPassage};
