//! Error types for chunking and index operations.

use askdocs_llm::LlmError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors that can occur while chunking, building, persisting, or
/// searching the vector index.
#[derive(Error, Debug)]
pub enum IndexError {
    /// Overlap must be strictly smaller than the chunk size. This is a
    /// configuration mistake, caught before any text is split.
    #[error("chunk_overlap ({overlap}) must be smaller than chunk_size ({size})")]
    InvalidChunking { size: usize, overlap: usize },

    #[error("search requires k >= 1")]
    InvalidTopK,

    #[error("Cannot build an index from zero passages")]
    NoPassages,

    /// The embedding client failed or was unreachable. Nothing partial
    /// is kept; the whole build aborts.
    #[error("Embedding failed: {0}")]
    Embedding(#[source] LlmError),

    #[error("Embedding client returned {actual} vectors for {expected} texts")]
    EmbeddingCount { expected: usize, actual: usize },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The snapshot was built with a different embedding function than
    /// the one currently configured; the caller must rebuild.
    #[error("Snapshot was built with embedding '{found}' but '{expected}' is configured; rebuild the index")]
    IncompatibleSnapshot { expected: String, found: String },

    #[error("No index snapshot at {0}")]
    SnapshotMissing(PathBuf),

    #[error("Failed to publish snapshot: {0}")]
    Persist(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
