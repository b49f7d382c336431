//! Extractor adapters for the supported file formats.

mod csv;
mod markdown;
mod pdf;
mod text;

pub use csv::CsvExtractor;
pub use markdown::MarkdownExtractor;
pub use pdf::PdfExtractor;
pub use text::TextExtractor;

use crate::error::ExtractResult;
use askdocs_core::RawDocument;
use std::path::Path;

/// Trait for format-specific text extractors.
pub trait DocumentExtractor: Send + Sync {
    /// Extract plain text from a file. One file may yield several
    /// documents (per page or row); each carries the source path.
    fn extract(&self, path: &Path) -> ExtractResult<Vec<RawDocument>>;

    /// File extensions this extractor handles.
    fn extensions(&self) -> &[&str];

    /// Check if this extractor supports the given extension.
    fn supports(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
