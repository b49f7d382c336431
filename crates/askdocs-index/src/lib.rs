//! Askdocs Index - passage chunking and the vector index.
//!
//! This crate provides:
//! - [`TextSplitter`]: separator-aware windowing of extracted text
//!   into overlapping passages
//! - [`VectorIndex`]: an immutable in-memory nearest-neighbor index
//!   with durable save/load through a JSON snapshot
//!
//! The index never supports deletion or in-place update; the only
//! mutation is a full rebuild.

mod chunker;
mod error;
mod index;

pub use chunker::{SplitConfig, TextSplitter};
pub use error::{IndexError, IndexResult};
pub use index::{snapshot_info, SnapshotInfo, VectorIndex, VectorRecord};
