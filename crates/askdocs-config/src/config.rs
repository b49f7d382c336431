//! Configuration structures and loading.

use crate::error::{ConfigError, ConfigResult};
use crate::paths::AppPaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub ingest: IngestConfig,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> ConfigResult<Self> {
        let paths = AppPaths::new().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&paths.config_file)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Validate cross-field invariants.
    ///
    /// Violations here are caller configuration mistakes, not runtime
    /// faults: the pipeline refuses to start until they are fixed.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(ConfigError::InvalidChunking {
                size: self.chunking.chunk_size,
                overlap: self.chunking.chunk_overlap,
            });
        }

        if self.retrieval.k_fallback == 0 || self.retrieval.k_primary == 0 {
            return Err(ConfigError::Invalid(
                "k_primary and k_fallback must be at least 1".to_string(),
            ));
        }

        if self.retrieval.k_fallback >= self.retrieval.k_primary {
            return Err(ConfigError::Invalid(format!(
                "k_fallback ({}) must be smaller than k_primary ({})",
                self.retrieval.k_fallback, self.retrieval.k_primary
            )));
        }

        if self.ingest.max_concurrent_files == 0 || self.ingest.embed_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_files and embed_batch_size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Create a default config file with comments.
    pub fn create_default_file(path: &PathBuf) -> ConfigResult<()> {
        let default_config = Self::default_config_string();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, default_config)?;
        Ok(())
    }

    /// Generate a default config file with helpful comments.
    pub fn default_config_string() -> String {
        r#"# Askdocs Configuration
# Ask questions about your own documents.

[general]
# Data directory for the persisted index
# data_dir = "~/.local/share/askdocs"

[openai]
# Base URL of the OpenAI-compatible API
api_base = "https://api.openai.com/v1"

# Environment variable holding the API key
api_key_env = "OPENAI_API_KEY"

# Model used to answer questions
chat_model = "gpt-4o"

# Model used to embed passages and questions
embedding_model = "text-embedding-3-small"

# Request timeout in seconds
timeout_seconds = 120

[chunking]
# Characters per passage; overlap must be smaller than the size
chunk_size = 300
chunk_overlap = 50

[retrieval]
# Passages retrieved for the primary answer attempt
k_primary = 5

# Passages retrieved when the model rejects an over-long prompt
k_fallback = 3

# Sampling temperatures for the two tiers
t_primary = 0.3
t_fallback = 0.0

[ingest]
# File extensions to ingest
extensions = ["pdf", "txt", "md", "csv"]

# Files extracted concurrently
max_concurrent_files = 4

# Passages per embedding request
embed_batch_size = 64
"#
        .to_string()
    }
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub data_dir: Option<String>,
}

/// OpenAI-compatible API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_base: String,
    pub api_key_env: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub timeout_seconds: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            chat_model: "gpt-4o".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            timeout_seconds: 120,
        }
    }
}

/// Passage chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 300,
            chunk_overlap: 50,
        }
    }
}

/// Retrieval and fallback settings for the query engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub k_primary: usize,
    pub k_fallback: usize,
    pub t_primary: f32,
    pub t_fallback: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k_primary: 5,
            k_fallback: 3,
            t_primary: 0.3,
            t_fallback: 0.0,
        }
    }
}

/// Ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub extensions: Vec<String>,
    pub max_concurrent_files: usize,
    pub embed_batch_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            extensions: vec![
                "pdf".to_string(),
                "txt".to_string(),
                "md".to_string(),
                "csv".to_string(),
            ],
            max_concurrent_files: 4,
            embed_batch_size: 64,
        }
    }
}
