//! Plain text extractor.

use super::DocumentExtractor;
use crate::error::{ExtractError, ExtractResult};
use askdocs_core::RawDocument;
use std::path::Path;

/// Extractor for plain text files.
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for TextExtractor {
    fn extract(&self, path: &Path) -> ExtractResult<Vec<RawDocument>> {
        if !path.exists() {
            return Err(ExtractError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(vec![]);
        }

        Ok(vec![RawDocument::new(content, path.to_string_lossy())])
    }

    fn extensions(&self) -> &[&str] {
        &["txt", "text", "log"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_extract_text() {
        let mut file = NamedTempFile::with_suffix(".txt").unwrap();
        writeln!(file, "This is a plain text file.\nWith multiple lines.").unwrap();

        let extractor = TextExtractor::new();
        let docs = extractor.extract(file.path()).unwrap();

        assert_eq!(docs.len(), 1);
        assert!(docs[0].text.contains("plain text file"));
        assert_eq!(docs[0].page_or_row, None);
    }

    #[test]
    fn test_empty_file_yields_nothing() {
        let file = NamedTempFile::with_suffix(".txt").unwrap();

        let extractor = TextExtractor::new();
        let docs = extractor.extract(file.path()).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let extractor = TextExtractor::new();
        let result = extractor.extract(Path::new("/no/such/file.txt"));
        assert!(matches!(result, Err(ExtractError::FileNotFound(_))));
    }
}
