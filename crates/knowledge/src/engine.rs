//! Answer orchestration: retrieve, gate, assemble, generate, cite.

use crate::confidence::{self, DEFAULT_THRESHOLD};
use crate::config::{
    GenerationSettings, RetrievalSettings, DEFAULT_EXCERPT_CHARS, DEFAULT_TOP_K,
};
use crate::context;
use crate::index::SimilarityIndex;
use crate::types::{AnswerOptions, AnswerResult, Citation, Passage, ScoredPassage};
use grounded_core::{AppError, AppResult};
use grounded_llm::{ChatMessage, LlmClient, LlmRequest};
use grounded_prompt::{
    build_prompt, builtin_prompt, PromptDefinition, ANSWER_PROMPT_ID, REFUSAL_ANSWER,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable per-engine settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Passages retrieved per question
    pub top_k: usize,

    /// Maximum raw distance at which an answer is attempted
    pub threshold: f64,

    /// Citation excerpt length in characters
    pub excerpt_chars: usize,

    /// Generation model identifier
    pub model: String,

    /// Sampling temperature for generation
    pub temperature: f32,

    /// Generation length cap
    pub max_tokens: Option<u32>,
}

impl EngineConfig {
    /// Defaults for everything except the model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            threshold: DEFAULT_THRESHOLD,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    /// Build and validate from loaded settings.
    pub fn from_settings(
        retrieval: &RetrievalSettings,
        generation: &GenerationSettings,
        model: impl Into<String>,
    ) -> AppResult<Self> {
        let config = Self {
            top_k: retrieval.top_k,
            threshold: retrieval.threshold,
            excerpt_chars: retrieval.excerpt_chars,
            model: model.into(),
            temperature: generation.temperature,
            max_tokens: generation.max_tokens,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the settings can drive an engine.
    pub fn validate(&self) -> AppResult<()> {
        if self.top_k == 0 {
            return Err(AppError::Config("topK must be at least 1".to_string()));
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(AppError::Config(format!(
                "threshold must be a positive number, got {}",
                self.threshold
            )));
        }
        if self.excerpt_chars == 0 {
            return Err(AppError::Config(
                "excerptChars must be at least 1".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(AppError::Config("Generation model is not set".to_string()));
        }
        Ok(())
    }
}

/// Grounded question answering over a similarity index.
///
/// Holds read-only collaborator handles and immutable settings, so one
/// engine can serve concurrent questions through `&self`.
pub struct AnswerEngine {
    index: Arc<dyn SimilarityIndex>,
    llm: Arc<dyn LlmClient>,
    prompt: PromptDefinition,
    config: EngineConfig,
}

impl AnswerEngine {
    /// Create an engine using the built-in answer prompt.
    pub fn new(
        index: Arc<dyn SimilarityIndex>,
        llm: Arc<dyn LlmClient>,
        config: EngineConfig,
    ) -> AppResult<Self> {
        config.validate()?;
        let prompt = builtin_prompt(ANSWER_PROMPT_ID).ok_or_else(|| {
            AppError::Prompt(format!("Built-in prompt '{}' is missing", ANSWER_PROMPT_ID))
        })?;

        Ok(Self {
            index,
            llm,
            prompt,
            config,
        })
    }

    /// Replace the answer prompt, e.g. with a workspace override.
    pub fn with_prompt(mut self, prompt: PromptDefinition) -> Self {
        self.prompt = prompt;
        self
    }

    /// Validated settings the engine answers with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Answer a question without returning the context block.
    pub async fn answer(&self, question: &str) -> AppResult<AnswerResult> {
        self.answer_with(question, AnswerOptions::default()).await
    }

    /// Answer a question.
    ///
    /// Blank questions, empty retrieval and retrieval weaker than the
    /// threshold produce the fixed refusal without calling the generation
    /// backend. Index and backend errors are returned as-is.
    #[tracing::instrument(skip(self, question, options), fields(top_k = self.config.top_k))]
    pub async fn answer_with(
        &self,
        question: &str,
        options: AnswerOptions,
    ) -> AppResult<AnswerResult> {
        let question = question.trim();
        if question.is_empty() {
            tracing::debug!("Blank question, refusing without retrieval");
            return Ok(refusal(None, options));
        }

        let retrieved = self
            .index
            .search_with_scores(question, self.config.top_k)
            .await?;

        if let Some(bad) = retrieved.iter().find(|sp| !sp.distance.is_finite()) {
            return Err(AppError::Index(format!(
                "Retrieval returned a non-finite distance {} for {}",
                bad.distance,
                bad.passage.source()
            )));
        }

        let Some(best) = best_distance(&retrieved) else {
            tracing::info!("No passages retrieved, refusing");
            return Ok(refusal(None, options));
        };

        let estimate = confidence::estimate(best, self.config.threshold)?;
        tracing::info!(
            "Retrieval gate: best distance {:.4}, threshold {:.4}, confidence {:.3}, accept {}",
            best,
            self.config.threshold,
            estimate.confidence,
            estimate.accept
        );

        if !estimate.accept {
            return Ok(refusal(Some(best), options));
        }

        let passages: Vec<Passage> = retrieved.iter().map(|sp| sp.passage.clone()).collect();
        let context_block = context::assemble(&passages);

        let request = self.build_request(question, &context_block)?;
        let response = self.llm.complete(&request).await?;

        tracing::debug!(
            "Generated answer with {} ({} completion tokens)",
            response.model,
            response.usage.completion_tokens
        );

        let citations = retrieved
            .iter()
            .enumerate()
            .map(|(i, sp)| Citation {
                rank: i + 1,
                source: sp.passage.source(),
                snippet: sp.passage.excerpt(self.config.excerpt_chars),
                score: normalize_score(sp.distance),
            })
            .collect();

        Ok(AnswerResult {
            answer: response.content,
            citations,
            confidence: estimate.confidence,
            used_llm: true,
            retrieval_score: Some(best),
            context: options.return_context.then_some(context_block),
        })
    }

    fn build_request(&self, question: &str, context_block: &str) -> AppResult<LlmRequest> {
        let mut variables = HashMap::new();
        variables.insert("context".to_string(), context_block.to_string());
        variables.insert("question".to_string(), question.to_string());

        let built = build_prompt(&self.prompt, variables)?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = built.system {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(built.user));

        let mut request = LlmRequest::new(messages, self.config.model.clone())
            .with_temperature(self.config.temperature);
        if let Some(max_tokens) = self.config.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        Ok(request)
    }
}

fn refusal(retrieval_score: Option<f64>, options: AnswerOptions) -> AnswerResult {
    AnswerResult {
        answer: REFUSAL_ANSWER.to_string(),
        citations: Vec::new(),
        confidence: 0.0,
        used_llm: false,
        retrieval_score,
        context: options.return_context.then(String::new),
    }
}

/// Lowest distance among the results, normalized to `f64`.
fn best_distance(retrieved: &[ScoredPassage]) -> Option<f64> {
    retrieved
        .iter()
        .map(|sp| sp.distance)
        .min_by(|a, b| a.total_cmp(b))
        .map(normalize_score)
}

/// Widen an `f32` distance through its shortest decimal form, so `0.1f32`
/// becomes `0.1` rather than `0.10000000149011612`.
pub fn normalize_score(raw: f32) -> f64 {
    raw.to_string()
        .parse::<f64>()
        .unwrap_or_else(|_| f64::from(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_score_uses_shortest_decimal() {
        assert_eq!(normalize_score(0.1), 0.1);
        assert_eq!(normalize_score(0.35), 0.35);
        assert_eq!(normalize_score(0.0), 0.0);
        assert_eq!(normalize_score(2.5), 2.5);
    }

    #[test]
    fn test_best_distance_is_minimum() {
        let retrieved = vec![
            ScoredPassage::new(Passage::new("b", "b.md"), 0.3),
            ScoredPassage::new(Passage::new("a", "a.md"), 0.1),
        ];
        assert_eq!(best_distance(&retrieved), Some(0.1));
        assert_eq!(best_distance(&[]), None);
    }

    #[test]
    fn test_engine_config_validation() {
        let retrieval = RetrievalSettings::default();
        let generation = GenerationSettings::default();
        let config = EngineConfig::from_settings(&retrieval, &generation, "llama3.2").unwrap();
        assert_eq!(config, EngineConfig::new("llama3.2"));

        for bad in [
            RetrievalSettings {
                top_k: 0,
                ..RetrievalSettings::default()
            },
            RetrievalSettings {
                threshold: 0.0,
                ..RetrievalSettings::default()
            },
            RetrievalSettings {
                threshold: f64::NAN,
                ..RetrievalSettings::default()
            },
            RetrievalSettings {
                excerpt_chars: 0,
                ..RetrievalSettings::default()
            },
        ] {
            assert!(matches!(
                EngineConfig::from_settings(&bad, &generation, "llama3.2"),
                Err(AppError::Config(_))
            ));
        }

        assert!(EngineConfig::from_settings(&retrieval, &generation, " ").is_err());
    }

    #[test]
    fn test_refusal_shape() {
        let result = refusal(Some(0.5), AnswerOptions::with_context());
        assert_eq!(result.answer, REFUSAL_ANSWER);
        assert!(result.citations.is_empty());
        assert_eq!(result.confidence, 0.0);
        assert!(!result.used_llm);
        assert_eq!(result.retrieval_score, Some(0.5));
        assert_eq!(result.context.as_deref(), Some(""));

        assert_eq!(refusal(None, AnswerOptions::default()).context, None);
    }
}
