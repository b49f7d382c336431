//! CLI command implementations.

pub mod ask;
pub mod ingest;
pub mod init;
pub mod shell;
pub mod status;

use anyhow::{Context, Result};
use askdocs_config::{AppPaths, Config};
use askdocs_engine::{EngineOptions, QueryEngine};
use askdocs_index::{IndexError, VectorIndex};
use askdocs_llm::OpenAiClient;
use std::sync::Arc;

/// Get the application paths.
pub fn get_paths() -> Result<AppPaths> {
    AppPaths::new().context("Failed to determine application directories")
}

/// Load and validate the configuration, ensuring askdocs is initialized.
pub fn load_config() -> Result<(AppPaths, Config)> {
    let paths = get_paths()?;

    if !paths.is_initialized() {
        anyhow::bail!("Askdocs is not initialized. Run 'askdocs init' first.");
    }

    let config = Config::load_from(&paths.config_file).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    Ok((paths, config))
}

/// Create the API client from config. The key comes from the
/// environment, so a missing key is reported with the variable name.
pub fn build_client(config: &Config) -> Result<OpenAiClient> {
    OpenAiClient::from_config(&config.openai).context("Failed to create API client")
}

/// Load the persisted index and wrap it in a query engine.
pub fn load_engine(
    paths: &AppPaths,
    config: &Config,
    client: OpenAiClient,
) -> Result<QueryEngine> {
    let index = match VectorIndex::load(&paths.snapshot_file, client.embedding_model()) {
        Ok(index) => index,
        Err(IndexError::SnapshotMissing(_)) => {
            anyhow::bail!("No index found. Run 'askdocs ingest <path>' first.");
        }
        Err(IndexError::IncompatibleSnapshot { expected, found }) => {
            anyhow::bail!(
                "The index was built with embedding model '{}' but '{}' is configured. \
                 Run 'askdocs ingest <path> --rebuild'.",
                found,
                expected
            );
        }
        Err(e) => return Err(e).context("Failed to load index"),
    };

    let client = Arc::new(client);
    Ok(QueryEngine::new(
        index,
        Arc::clone(&client) as Arc<dyn askdocs_llm::Embedder>,
        client as Arc<dyn askdocs_llm::ChatModel>,
        EngineOptions::from(&config.retrieval),
    ))
}
