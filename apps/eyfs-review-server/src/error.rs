//! Error types for the review server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::session::SessionError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("No analysis results available")]
    NoResults,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ServerError::DocumentNotFound(id) => (
                StatusCode::NOT_FOUND,
                "DOCUMENT_NOT_FOUND",
                format!("Document '{}' not found", id),
            ),
            ServerError::NoResults => (
                StatusCode::CONFLICT,
                "NO_RESULTS",
                "Select a document and wait for the analysis to finish".to_string(),
            ),
            ServerError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<SessionError> for ServerError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::UnknownDocument(id) => ServerError::DocumentNotFound(id.to_string()),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for ServerError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ServerError::InvalidRequest(err.body_text())
    }
}
