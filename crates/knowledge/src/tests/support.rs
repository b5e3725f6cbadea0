//! Spy and scripted collaborators implementing the real traits.

use crate::index::SimilarityIndex;
use crate::types::{Passage, ScoredPassage};
use grounded_core::{AppError, AppResult};
use grounded_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage, Role};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Index returning canned results per query and recording every call.
#[derive(Default)]
pub struct SpyIndex {
    default_results: Vec<ScoredPassage>,
    by_query: HashMap<String, Vec<ScoredPassage>>,
    fail_with: Option<String>,
    calls: AtomicUsize,
    queries: Mutex<Vec<(String, usize)>>,
}

impl SpyIndex {
    pub fn returning(results: Vec<ScoredPassage>) -> Self {
        Self {
            default_results: results,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query: &str, results: Vec<ScoredPassage>) -> Self {
        self.by_query.insert(query.to_string(), results);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SimilarityIndex for SpyIndex {
    async fn search_with_scores(&self, query: &str, k: usize) -> AppResult<Vec<ScoredPassage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push((query.to_string(), k));

        if let Some(message) = &self.fail_with {
            return Err(AppError::Index(message.clone()));
        }

        let mut results = self
            .by_query
            .get(query)
            .cloned()
            .unwrap_or_else(|| self.default_results.clone());
        results.truncate(k);
        Ok(results)
    }
}

type Reply = Box<dyn Fn(&LlmRequest) -> AppResult<String> + Send + Sync>;

/// Generation backend answering through a closure and recording requests.
pub struct ScriptedLlm {
    reply: Reply,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(&LlmRequest) -> AppResult<String> + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always replies with the same text.
    pub fn constant(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Always fails with an LLM error.
    pub fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::new(move |_| Err(AppError::Llm(message.clone())))
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let content = (self.reply)(request)?;
        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::new(10, 5),
        })
    }
}

/// Content of the last user message of a request.
pub fn user_content(request: &LlmRequest) -> &str {
    request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .unwrap_or_default()
}

pub fn scored(text: &str, source: &str, distance: f32) -> ScoredPassage {
    ScoredPassage::new(Passage::new(text, source), distance)
}
