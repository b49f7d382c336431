//! Askdocs Extract - text extractor adapters.
//!
//! One adapter per supported format, selected through an extension
//! registry. Every adapter returns plain text plus page/row metadata;
//! a failing file is the caller's problem to skip, never this crate's
//! problem to hide.

mod error;
mod extractors;
mod registry;

pub use error::{ExtractError, ExtractResult};
pub use extractors::{CsvExtractor, DocumentExtractor, MarkdownExtractor, PdfExtractor, TextExtractor};
pub use registry::ExtractorRegistry;
