//! API handlers for the review server
//!
//! Provides REST endpoints for:
//! - Document upload and listing
//! - Selecting a document (starts an analysis run)
//! - Review state polling
//! - Report export and framework reference

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use compliance_engine::ReferenceFramework;
use report_engine::export_report;
use serde::Serialize;
use shared_types::UploadedDocument;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ServerError;
use crate::session::{AnalysisTicket, Phase, ReviewState};
use crate::state::AppState;

/// Multipart field carrying an uploaded file
const FILE_FIELD: &str = "file";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "eyfs-review-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Document list response
#[derive(Serialize)]
pub struct DocumentListResponse {
    pub success: bool,
    pub documents: Vec<UploadedDocument>,
    pub count: usize,
}

/// Handler: POST /api/documents
///
/// Every `file` field becomes a new document. Other fields are ignored.
pub async fn handle_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<DocumentListResponse>, ServerError> {
    let mut documents = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or("document").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let payload = field.bytes().await?;

        debug!(%name, %mime_type, bytes = payload.len(), "Received upload");
        documents.push(UploadedDocument::new(name, mime_type, payload));
    }

    if documents.is_empty() {
        return Err(ServerError::InvalidRequest(format!(
            "Upload must contain at least one '{}' field",
            FILE_FIELD
        )));
    }

    info!(count = documents.len(), "Documents uploaded");
    state.session.add_documents(documents.clone()).await;

    let count = documents.len();
    Ok(Json(DocumentListResponse {
        success: true,
        documents,
        count,
    }))
}

/// Handler: GET /api/documents
pub async fn handle_list_documents(
    State(state): State<Arc<AppState>>,
) -> Json<DocumentListResponse> {
    let documents = state.session.snapshot().await.documents;
    let count = documents.len();

    Json(DocumentListResponse {
        success: true,
        documents,
        count,
    })
}

/// Selection response
#[derive(Serialize)]
pub struct SelectResponse {
    pub success: bool,
    pub ticket: AnalysisTicket,
}

/// Handler: POST /api/documents/:id/select
///
/// Returns as soon as the run is started; poll `/api/state` for the outcome.
pub async fn handle_select(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let document_id =
        Uuid::parse_str(&id).map_err(|_| ServerError::DocumentNotFound(id.clone()))?;

    let (ticket, document) = state.session.select(document_id).await?;
    info!(run_id = ticket.run_id, file_name = %document.name, "Document selected");
    state.spawn_analysis(ticket, document);

    Ok((
        StatusCode::ACCEPTED,
        Json(SelectResponse {
            success: true,
            ticket,
        }),
    ))
}

/// Review state response
#[derive(Serialize)]
pub struct StateResponse {
    pub phase: Phase,
    #[serde(flatten)]
    pub state: ReviewState,
}

/// Handler: GET /api/state
pub async fn handle_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let snapshot = state.session.snapshot().await;
    Json(StateResponse {
        phase: snapshot.phase(),
        state: snapshot,
    })
}

/// Handler: GET /api/report
pub async fn handle_report(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let snapshot = state.session.snapshot().await;
    let results = snapshot.results.ok_or(ServerError::NoResults)?;

    let export = export_report(
        results.analysis.data(),
        results.narrative.data(),
        Utc::now(),
    );
    info!(file_name = %export.file_name, "Report downloaded");

    let disposition = attachment_disposition(&export.file_name);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, export.mime_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.into_bytes(),
    ))
}

/// `Content-Disposition` with an ASCII `filename` and a UTF-8 `filename*` (RFC 6266)
fn attachment_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(file_name)
    )
}

/// Handler: GET /api/framework
pub async fn handle_framework(
    State(state): State<Arc<AppState>>,
) -> Json<&'static ReferenceFramework> {
    Json(state.orchestrator.framework())
}
