//! Retrieval, embedding and generation settings.
//!
//! Loaded from `.grounded/knowledge.yaml`; every field has a default so a
//! missing or partial file is fine.

use crate::confidence::DEFAULT_THRESHOLD;
use grounded_core::config::STATE_DIR;
use grounded_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default number of passages retrieved per question.
pub const DEFAULT_TOP_K: usize = 4;

/// Default citation excerpt length, in characters.
pub const DEFAULT_EXCERPT_CHARS: usize = 240;

/// Settings for the answering pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub retrieval: RetrievalSettings,
    pub embedding: EmbeddingSettings,
    pub generation: GenerationSettings,
}

/// Where the index lives and how retrieval is gated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetrievalSettings {
    /// LanceDB directory, relative paths resolve against the workspace
    pub index_path: PathBuf,

    /// Passage table name
    pub table: String,

    /// Passages retrieved per question
    pub top_k: usize,

    /// Maximum raw distance at which an answer is attempted
    pub threshold: f64,

    /// Citation excerpt length in characters
    pub excerpt_chars: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from(STATE_DIR).join("index"),
            table: "passages".to_string(),
            top_k: DEFAULT_TOP_K,
            threshold: DEFAULT_THRESHOLD,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }
}

/// Query embedding provider. Must match the provider that built the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Provider name: "ollama" or "mock"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Provider base URL override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
            endpoint: None,
        }
    }
}

/// Sampling parameters for answer generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationSettings {
    pub temperature: f32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: None,
        }
    }
}

impl KnowledgeConfig {
    /// Absolute index location for a workspace.
    pub fn index_path(&self, workspace: &Path) -> PathBuf {
        if self.retrieval.index_path.is_absolute() {
            self.retrieval.index_path.clone()
        } else {
            workspace.join(&self.retrieval.index_path)
        }
    }
}

/// Load settings from `.grounded/knowledge.yaml`, or defaults if absent.
pub fn load_config(workspace: &Path) -> AppResult<KnowledgeConfig> {
    let config_path = get_config_path(workspace);

    if !config_path.exists() {
        tracing::debug!("No knowledge config at {:?}, using defaults", config_path);
        return Ok(KnowledgeConfig::default());
    }

    let content = fs::read_to_string(&config_path).map_err(|e| {
        AppError::Config(format!("Failed to read config at {:?}: {}", config_path, e))
    })?;

    let config: KnowledgeConfig = serde_yaml::from_str(&content).map_err(|e| {
        AppError::Config(format!("Failed to parse config at {:?}: {}", config_path, e))
    })?;

    tracing::debug!("Loaded knowledge config from {:?}", config_path);
    Ok(config)
}

/// Save settings to `.grounded/knowledge.yaml`.
pub fn save_config(workspace: &Path, config: &KnowledgeConfig) -> AppResult<()> {
    let config_path = get_config_path(workspace);

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    let yaml = serde_yaml::to_string(config)?;

    fs::write(&config_path, yaml).map_err(|e| {
        AppError::Config(format!("Failed to write config to {:?}: {}", config_path, e))
    })?;

    tracing::debug!("Saved knowledge config to {:?}", config_path);
    Ok(())
}

/// Path of the knowledge settings file.
pub fn get_config_path(workspace: &Path) -> PathBuf {
    workspace.join(STATE_DIR).join("knowledge.yaml")
}
