//! Wiring of configuration into a ready answer engine.

use grounded_core::{config::AppConfig, AppError, AppResult};
use grounded_knowledge::embeddings::create_provider;
use grounded_knowledge::{load_config, AnswerEngine, EngineConfig, LanceDbIndex};
use grounded_llm::{create_client, LlmClient};
use grounded_prompt::{load_prompt, ANSWER_PROMPT_ID};
use std::sync::Arc;

/// Collaborators built once per process and shared by reference.
pub struct Runtime {
    pub engine: AnswerEngine,
    pub llm: Arc<dyn LlmClient>,
}

impl Runtime {
    /// Load settings, open the index and connect the generation backend.
    pub async fn build(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;

        let knowledge = load_config(&config.workspace)?;
        let engine_config = EngineConfig::from_settings(
            &knowledge.retrieval,
            &knowledge.generation,
            config.model.clone(),
        )?;

        let embedder = create_provider(&knowledge.embedding)?;
        let index = LanceDbIndex::open(
            &knowledge.index_path(&config.workspace),
            &knowledge.retrieval.table,
            embedder,
        )
        .await?;

        let endpoint = config.resolve_endpoint();
        let api_key = config.resolve_api_key(&config.provider);
        let llm = create_client(
            &config.provider,
            endpoint.as_deref(),
            api_key.as_deref(),
            config.resolve_timeout(),
        )
        .map_err(AppError::Config)?;

        let prompt = load_prompt(&config.workspace, ANSWER_PROMPT_ID)?;

        let engine = AnswerEngine::new(Arc::new(index), Arc::clone(&llm), engine_config)?
            .with_prompt(prompt);

        let settings = engine.config();
        tracing::debug!(
            "Engine ready: provider={}, model={}, top_k={}, threshold={}",
            llm.provider_name(),
            settings.model,
            settings.top_k,
            settings.threshold
        );

        Ok(Self { engine, llm })
    }
}
