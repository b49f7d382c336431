//! Askdocs Engine - ingestion pipeline and query engine.
//!
//! [`IngestPipeline`] turns a directory of documents into a built and
//! persisted [`askdocs_index::VectorIndex`], reusing an existing
//! snapshot when one is present. [`QueryEngine`] answers questions over
//! that index, retrying once with a shorter context when the model
//! rejects an over-long prompt.

mod engine;
mod error;
mod pipeline;
mod prompt;

pub use engine::{EngineOptions, QueryEngine};
pub use error::{EngineError, EngineResult};
pub use pipeline::{IngestPipeline, IngestReport};
