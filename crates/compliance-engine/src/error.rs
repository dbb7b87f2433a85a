use document_text::ExtractionError;
use thiserror::Error;

/// Failures talking to the completion service
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Cannot reach completion service at {0}")]
    Connection(String),

    #[error("Completion request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Completion service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Unreadable completion response: {0}")]
    ResponseParsing(String),

    #[error("Completion response contained no text")]
    EmptyResponse,

    #[error("Completion client misconfigured: {0}")]
    Config(String),
}

/// Why a pipeline stage fell back to its static record
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Text extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Extraction task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("Response is not valid JSON: {0}")]
    JsonParsing(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}
