//! PDF extractor.

use super::DocumentExtractor;
use crate::error::{ExtractError, ExtractResult};
use askdocs_core::RawDocument;
use std::path::Path;
use tracing::debug;

/// Extractor for PDF files. The extracted text is split on form feed
/// characters into pages, each carrying its 1-based page number.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> ExtractResult<Vec<RawDocument>> {
        if !path.exists() {
            return Err(ExtractError::FileNotFound(path.to_path_buf()));
        }

        debug!("Extracting PDF: {:?}", path);

        let content = pdf_extract::extract_text(path).map_err(|e| ExtractError::ParseError {
            path: path.to_path_buf(),
            message: format!("Failed to extract text from PDF: {}", e),
        })?;

        let source = path.to_string_lossy().to_string();
        let docs: Vec<RawDocument> = content
            .split('\x0C')
            .map(clean_page_text)
            .enumerate()
            .filter(|(_, text)| !text.is_empty())
            .map(|(i, text)| RawDocument::new(text, &source).with_page_or_row(i as u32 + 1))
            .collect();

        debug!("Extracted {} non-empty pages from {:?}", docs.len(), path);

        Ok(docs)
    }

    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }
}

/// Clean up one page of extracted PDF text: trim lines and collapse
/// runs of blank lines.
fn clean_page_text(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        let last_was_empty = lines.last().map(|l| l.is_empty()).unwrap_or(true);
        if !(line.is_empty() && last_was_empty) {
            lines.push(line);
        }
    }
    lines.join("\n").trim().to_string()
}
