use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Format tag attached to every upload.
///
/// Derived from the filename suffix alone: anything that is not `.pdf`
/// is tagged `Word`, there is no third bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    #[serde(rename = "PDF")]
    Pdf,
    Word,
}

impl DocumentFormat {
    pub fn from_file_name(name: &str) -> Self {
        if name.to_lowercase().ends_with(".pdf") {
            DocumentFormat::Pdf
        } else {
            DocumentFormat::Word
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Word => "Word",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A policy document as received from the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDocument {
    pub id: Uuid,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub format: DocumentFormat,
    /// Raw file bytes; never serialized
    #[serde(skip)]
    pub payload: Bytes,
}

impl UploadedDocument {
    /// Wrap an incoming file with a fresh identity and upload timestamp
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, payload: Bytes) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            format: DocumentFormat::from_file_name(&name),
            size: payload.len() as u64,
            mime_type: mime_type.into(),
            uploaded_at: Utc::now(),
            name,
            payload,
        }
    }

    /// File name with its last extension removed (`policy.docx` -> `policy`)
    pub fn stem(&self) -> &str {
        file_stem(&self.name)
    }
}

/// Strip the final `.ext` from a file name.
///
/// Only a non-empty extension with no path separator counts, so
/// `archive.tar.gz` keeps `archive.tar` and `notes.` is returned unchanged.
pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() && !name[idx + 1..].contains('/') => &name[..idx],
        _ => name,
    }
}
