//! LLM-as-judge scoring.

use grounded_core::{AppError, AppResult};
use grounded_llm::{ChatMessage, LlmClient, LlmRequest};
use grounded_prompt::{
    build_prompt, builtin_prompt, PromptDefinition, FAITHFULNESS_PROMPT_ID, RELEVANCE_PROMPT_ID,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Scores answers with yes/no questions put to a judge model.
pub struct Judge {
    llm: Arc<dyn LlmClient>,
    model: String,
    faithfulness: PromptDefinition,
    relevance: PromptDefinition,
}

impl Judge {
    /// Create a judge using the built-in judge prompts.
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            llm,
            model: model.into(),
            faithfulness: builtin(FAITHFULNESS_PROMPT_ID)?,
            relevance: builtin(RELEVANCE_PROMPT_ID)?,
        })
    }

    /// Replace the judge prompts, e.g. with workspace overrides.
    pub fn with_prompts(mut self, faithfulness: PromptDefinition, relevance: PromptDefinition) -> Self {
        self.faithfulness = faithfulness;
        self.relevance = relevance;
        self
    }

    /// True when the judge says the answer adds nothing beyond the context.
    ///
    /// An empty context or answer is never faithful and skips the judge.
    pub async fn score_faithfulness(
        &self,
        context: &str,
        question: &str,
        answer: &str,
    ) -> AppResult<bool> {
        if context.is_empty() || answer.is_empty() {
            return Ok(false);
        }

        let verdict = self
            .ask(
                &self.faithfulness,
                &[("context", context), ("question", question), ("answer", answer)],
            )
            .await?;
        Ok(verdict.starts_with("NO"))
    }

    /// True when the judge says the answer addresses the question.
    ///
    /// An empty answer is never relevant and skips the judge.
    pub async fn score_relevance(&self, question: &str, answer: &str) -> AppResult<bool> {
        if answer.is_empty() {
            return Ok(false);
        }

        let verdict = self
            .ask(&self.relevance, &[("question", question), ("answer", answer)])
            .await?;
        Ok(verdict.starts_with("YES"))
    }

    /// Send one judge prompt and return the trimmed, upper-cased reply.
    async fn ask(&self, prompt: &PromptDefinition, vars: &[(&str, &str)]) -> AppResult<String> {
        let variables: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let built = build_prompt(prompt, variables)?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = built.system {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(built.user));

        let request = LlmRequest::new(messages, self.model.clone()).with_temperature(0.0);
        let response = self.llm.complete(&request).await?;

        tracing::debug!("Judge '{}' replied: {}", prompt.id, response.content.trim());
        Ok(response.content.trim().to_uppercase())
    }
}

fn builtin(id: &str) -> AppResult<PromptDefinition> {
    builtin_prompt(id)
        .ok_or_else(|| AppError::Prompt(format!("Built-in prompt '{}' is missing", id)))
}
