//! Core domain types for askdocs.

use serde::{Deserialize, Serialize};

/// A raw document produced by a text extractor, before chunking.
///
/// One source file may yield several of these (one per PDF page or CSV
/// row); plain text files yield exactly one.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Extracted plain text.
    pub text: String,
    /// Path of the file this text came from.
    pub source_path: String,
    /// Page number (PDF) or row number (CSV), 1-based. `None` for
    /// formats without an internal position.
    pub page_or_row: Option<u32>,
}

impl RawDocument {
    pub fn new(text: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_path: source_path.into(),
            page_or_row: None,
        }
    }

    /// Set the page or row number.
    pub fn with_page_or_row(mut self, n: u32) -> Self {
        self.page_or_row = Some(n);
        self
    }
}

/// The immutable unit of retrieval: one chunk of text plus its source
/// metadata. Created by the splitter, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    /// The chunk text.
    pub text: String,
    /// Path of the source file.
    pub source_path: String,
    /// Page number (PDF) or row number (CSV), if the format has one.
    pub page_or_row: Option<u32>,
    /// Position among the chunks produced from the same source file.
    pub sequence_index: usize,
}

/// A passage paired with its relevance score for one query.
#[derive(Debug, Clone)]
pub struct ScoredPassage {
    pub passage: Passage,
    /// Cosine similarity against the query vector; higher is better.
    pub score: f32,
}

/// The ordered result of a single retrieval; ephemeral, not persisted.
pub type RetrievalResult = Vec<ScoredPassage>;

/// Final answer to a question together with the passages it was
/// grounded on.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// The generated answer text.
    pub answer: String,
    /// The passages the answer was conditioned on, best first.
    pub retrieved: RetrievalResult,
    /// Sampling temperature used for the successful generation.
    pub temperature: f32,
    /// Whether the shorter-context fallback tier produced this answer.
    pub used_fallback: bool,
}
