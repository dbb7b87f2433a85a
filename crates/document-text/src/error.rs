use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The Word container could not be opened as a zip archive
    #[error("Invalid Word archive: {0}")]
    Archive(String),

    #[error("Word archive is missing {0}")]
    MissingPart(&'static str),

    #[error("PDF parse error: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
