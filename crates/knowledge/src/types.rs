//! Passage, citation and answer types.

use serde::{Deserialize, Serialize};

/// Source label used when a passage carries no `source` metadata.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// A retrievable unit of document text plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    /// Passage text
    pub text: String,

    /// Arbitrary metadata; `source` names the originating document
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Passage {
    /// Create a passage with a `source` metadata entry.
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        let mut metadata = serde_json::Map::new();
        metadata.insert(
            "source".to_string(),
            serde_json::Value::String(source.into()),
        );
        Self {
            text: text.into(),
            metadata,
        }
    }

    /// Create a passage without any metadata.
    pub fn without_source(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Source label, or `"unknown"` when absent or null.
    pub fn source(&self) -> String {
        match self.metadata.get("source") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => UNKNOWN_SOURCE.to_string(),
            Some(other) => other.to_string(),
        }
    }

    /// First `max_chars` characters of the text.
    pub fn excerpt(&self, max_chars: usize) -> String {
        self.text.chars().take(max_chars).collect()
    }
}

/// A passage paired with the index's raw distance (lower is closer).
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPassage {
    pub passage: Passage,
    pub distance: f32,
}

impl ScoredPassage {
    pub fn new(passage: Passage, distance: f32) -> Self {
        Self { passage, distance }
    }
}

/// Reference from an answer back to one retrieved passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// 1-based rank in retrieval order
    pub rank: usize,

    /// Originating document
    pub source: String,

    /// Leading excerpt of the passage text
    pub snippet: String,

    /// Raw retrieval distance
    pub score: f64,
}

/// Outcome of one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Generated answer or the fixed refusal
    pub answer: String,

    /// Passages the answer was conditioned on; empty when refused
    pub citations: Vec<Citation>,

    /// Calibrated confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Whether the generation backend was invoked
    pub used_llm: bool,

    /// Best raw distance, absent when nothing was retrieved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_score: Option<f64>,

    /// Context block sent to the backend, present only when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Per-call options for [`crate::engine::AnswerEngine::answer_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerOptions {
    /// Include the assembled context block in the result
    pub return_context: bool,
}

impl AnswerOptions {
    pub fn with_context() -> Self {
        Self {
            return_context: true,
        }
    }
}
