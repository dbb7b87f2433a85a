//! Plain-text extraction for uploaded policy documents
//!
//! The reviewer only ever needs a flat string to embed in a prompt, so each
//! backend collapses its format down to UTF-8 text:
//!
//! - Word (`.docx`, `.doc`): text runs pulled from `word/document.xml`
//! - PDF (`.pdf`): `pdf-extract`
//! - anything else: the bytes decoded verbatim as UTF-8 (lossy)
//!
//! Routing is by file name only. Corrupt or mislabelled input surfaces as an
//! [`ExtractionError`] for the caller to deal with.

pub mod error;
pub mod pdf;
pub mod plain;
pub mod word;

pub use error::ExtractionError;

use tracing::debug;

/// Which backend handles a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Word,
    Pdf,
    PlainText,
}

impl SourceKind {
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.ends_with(".docx") || lower.ends_with(".doc") {
            SourceKind::Word
        } else if lower.ends_with(".pdf") {
            SourceKind::Pdf
        } else {
            SourceKind::PlainText
        }
    }
}

/// Narrow seam between the analysis pipeline and document parsing
pub trait TextExtractor: Send + Sync {
    fn extract(&self, file_name: &str, data: &[u8]) -> Result<String, ExtractionError>;
}

/// Default extractor routing on the file name
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentTextExtractor;

impl DocumentTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for DocumentTextExtractor {
    fn extract(&self, file_name: &str, data: &[u8]) -> Result<String, ExtractionError> {
        let kind = SourceKind::from_file_name(file_name);
        debug!(file_name, ?kind, bytes = data.len(), "Extracting document text");

        let text = match kind {
            SourceKind::Word => word::extract_text(data)?,
            SourceKind::Pdf => pdf::extract_text(data)?,
            SourceKind::PlainText => plain::extract_text(data),
        };

        debug!(file_name, chars = text.chars().count(), "Extraction complete");
        Ok(text)
    }
}
