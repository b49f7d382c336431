//! CSV extractor.

use super::DocumentExtractor;
use crate::error::{ExtractError, ExtractResult};
use askdocs_core::RawDocument;
use std::path::Path;

/// Extractor for CSV files. Each data row becomes one document of
/// `header: value` lines, with the 1-based row number as metadata.
pub struct CsvExtractor;

impl CsvExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for CsvExtractor {
    fn extract(&self, path: &Path) -> ExtractResult<Vec<RawDocument>> {
        if !path.exists() {
            return Err(ExtractError::FileNotFound(path.to_path_buf()));
        }

        let mut reader = csv::Reader::from_path(path).map_err(|e| ExtractError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ExtractError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let source = path.to_string_lossy().to_string();
        let mut docs = Vec::new();

        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(|e| ExtractError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

            let text = headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| format!("{}: {}", h, v))
                .collect::<Vec<_>>()
                .join("\n");

            if text.trim().is_empty() {
                continue;
            }

            docs.push(RawDocument::new(text, &source).with_page_or_row(i as u32 + 1));
        }

        Ok(docs)
    }

    fn extensions(&self) -> &[&str] {
        &["csv"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_extract_csv_rows() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "name,role\nAda,engineer\nGrace,admiral").unwrap();

        let extractor = CsvExtractor::new();
        let docs = extractor.extract(file.path()).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].text, "name: Ada\nrole: engineer");
        assert_eq!(docs[0].page_or_row, Some(1));
        assert_eq!(docs[1].page_or_row, Some(2));
    }

    #[test]
    fn test_malformed_csv_is_a_parse_error() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        // Unbalanced quote makes the reader fail mid-stream
        writeln!(file, "a,b\n\"oops,1\nfine,2").unwrap();

        let extractor = CsvExtractor::new();
        let result = extractor.extract(file.path());
        assert!(matches!(result, Err(ExtractError::ParseError { .. })));
    }
}
