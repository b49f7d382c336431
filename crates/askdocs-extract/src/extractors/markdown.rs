//! Markdown extractor.

use super::DocumentExtractor;
use crate::error::{ExtractError, ExtractResult};
use askdocs_core::RawDocument;
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;

/// Extractor for Markdown files. Renders the document to plain text,
/// keeping code blocks and list structure readable.
pub struct MarkdownExtractor;

impl MarkdownExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Render markdown to plain text.
    fn extract_text(&self, markdown: &str) -> String {
        let parser = Parser::new(markdown);
        let mut text = String::new();

        for event in parser {
            match event {
                Event::End(Tag::Heading(_, _, _)) | Event::End(Tag::Paragraph) => {
                    text.push_str("\n\n");
                }
                Event::Start(Tag::CodeBlock(_)) => {
                    text.push('\n');
                }
                Event::End(Tag::CodeBlock(_)) => {
                    text.push('\n');
                }
                Event::Start(Tag::Item) => {
                    text.push_str("- ");
                }
                Event::End(Tag::Item) => {
                    text.push('\n');
                }
                Event::End(Tag::List(_)) => {
                    text.push('\n');
                }
                Event::Text(t) => {
                    text.push_str(&t);
                }
                Event::Code(code) => {
                    text.push('`');
                    text.push_str(&code);
                    text.push('`');
                }
                Event::SoftBreak | Event::HardBreak => {
                    text.push('\n');
                }
                _ => {}
            }
        }

        text.trim().to_string()
    }
}

impl Default for MarkdownExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for MarkdownExtractor {
    fn extract(&self, path: &Path) -> ExtractResult<Vec<RawDocument>> {
        if !path.exists() {
            return Err(ExtractError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let text = self.extract_text(&content);
        if text.is_empty() {
            return Ok(vec![]);
        }

        Ok(vec![RawDocument::new(text, path.to_string_lossy())])
    }

    fn extensions(&self) -> &[&str] {
        &["md", "markdown", "mdown", "mkd"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_extract_markdown() {
        let mut file = NamedTempFile::with_suffix(".md").unwrap();
        writeln!(
            file,
            r#"# My Document

This is a paragraph with some text.

## Section One

More content here.

- Item one
- Item two
"#
        )
        .unwrap();

        let extractor = MarkdownExtractor::new();
        let docs = extractor.extract(file.path()).unwrap();

        assert_eq!(docs.len(), 1);
        let text = &docs[0].text;
        assert!(text.contains("My Document"));
        assert!(text.contains("This is a paragraph"));
        assert!(text.contains("- Item one"));
        // Markdown syntax should be gone
        assert!(!text.contains("# My Document"));
    }

    #[test]
    fn test_inline_code_preserved() {
        let mut file = NamedTempFile::with_suffix(".md").unwrap();
        writeln!(file, "Run `cargo test` to check.").unwrap();

        let extractor = MarkdownExtractor::new();
        let docs = extractor.extract(file.path()).unwrap();
        assert!(docs[0].text.contains("`cargo test`"));
    }
}
