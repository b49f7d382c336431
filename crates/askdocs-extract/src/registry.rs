//! Extension registry for extractor adapters.

use crate::error::{ExtractError, ExtractResult};
use crate::extractors::{
    CsvExtractor, DocumentExtractor, MarkdownExtractor, PdfExtractor, TextExtractor,
};
use askdocs_core::RawDocument;
use std::path::Path;

/// Maps file extensions to extractor adapters.
///
/// Dispatch is a lookup over the registered adapters' declared
/// extensions; an unknown extension is an `UnsupportedFileType` error,
/// which the ingestion pipeline treats like any other per-file failure.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn DocumentExtractor>>,
}

impl ExtractorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Create a registry with all built-in adapters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PdfExtractor::new()));
        registry.register(Box::new(MarkdownExtractor::new()));
        registry.register(Box::new(CsvExtractor::new()));
        registry.register(Box::new(TextExtractor::new()));
        registry
    }

    /// Register an adapter. Earlier registrations win on overlap.
    pub fn register(&mut self, extractor: Box<dyn DocumentExtractor>) {
        self.extractors.push(extractor);
    }

    /// Find the adapter for an extension.
    pub fn for_extension(&self, extension: &str) -> Option<&dyn DocumentExtractor> {
        self.extractors
            .iter()
            .find(|e| e.supports(extension))
            .map(|e| e.as_ref())
    }

    /// Whether any adapter handles the extension.
    pub fn supports(&self, extension: &str) -> bool {
        self.for_extension(extension).is_some()
    }

    /// Extract a file by looking up its extension.
    pub fn extract(&self, path: &Path) -> ExtractResult<Vec<RawDocument>> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let extractor = self
            .for_extension(extension)
            .ok_or_else(|| ExtractError::UnsupportedFileType(extension.to_string()))?;

        extractor.extract(path)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
