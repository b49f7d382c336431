//! Askdocs Core - domain types shared across the retrieval pipeline.

mod types;

pub use types::*;
