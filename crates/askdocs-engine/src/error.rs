//! Error types for the pipeline and query engine.

use askdocs_index::IndexError;
use askdocs_llm::LlmError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors from ingestion and question answering.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Documents directory not found: {0}")]
    DocsDirMissing(PathBuf),

    /// Every candidate file failed extraction or produced no text.
    /// There is nothing to index, which is an error rather than an
    /// empty index.
    #[error("No text could be extracted from any file; nothing to index")]
    EmptyCorpus,

    #[error("Question is empty")]
    EmptyQuestion,

    #[error("Ingestion task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
