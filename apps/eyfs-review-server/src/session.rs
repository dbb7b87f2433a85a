//! Upload and selection state
//!
//! All mutation goes through [`reduce`], a pure function from the current
//! state and an event to the next state. [`SessionStore`] applies events under
//! a write lock so each transition is atomic.
//!
//! Every selection issues a fresh [`AnalysisTicket`]. A finished analysis is
//! only applied if its ticket is still the active one, so a slow run for an
//! earlier selection can never overwrite the results of a later one.

use std::sync::Arc;

use serde::Serialize;
use shared_types::{ReviewResult, UploadedDocument};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Document not found: {0}")]
    UnknownDocument(Uuid),
}

/// Identifies one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisTicket {
    pub run_id: u64,
    pub document_id: Uuid,
}

/// What the review screen should be showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NoResults,
    Analyzing,
    ResultsReady,
}

#[derive(Debug, Clone)]
pub enum ReviewEvent {
    DocumentsAdded(Vec<UploadedDocument>),
    DocumentSelected { document_id: Uuid },
    AnalysisFinished {
        ticket: AnalysisTicket,
        result: ReviewResult,
    },
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    pub documents: Vec<UploadedDocument>,
    pub selected_document: Option<Uuid>,
    pub analyzing: bool,
    pub active_run: Option<AnalysisTicket>,
    pub results: Option<ReviewResult>,
    #[serde(skip)]
    last_run_id: u64,
}

impl ReviewState {
    pub fn phase(&self) -> Phase {
        if self.analyzing {
            Phase::Analyzing
        } else if self.results.is_some() {
            Phase::ResultsReady
        } else {
            Phase::NoResults
        }
    }

    pub fn document(&self, id: Uuid) -> Option<&UploadedDocument> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn selected(&self) -> Option<&UploadedDocument> {
        self.selected_document.and_then(|id| self.document(id))
    }
}

/// Compute the next state for an event
pub fn reduce(mut state: ReviewState, event: ReviewEvent) -> Result<ReviewState, SessionError> {
    match event {
        ReviewEvent::DocumentsAdded(documents) => {
            state.documents.extend(documents);
        }
        ReviewEvent::DocumentSelected { document_id } => {
            if state.document(document_id).is_none() {
                return Err(SessionError::UnknownDocument(document_id));
            }
            state.last_run_id += 1;
            state.selected_document = Some(document_id);
            state.results = None;
            state.analyzing = true;
            state.active_run = Some(AnalysisTicket {
                run_id: state.last_run_id,
                document_id,
            });
        }
        ReviewEvent::AnalysisFinished { ticket, result } => {
            if state.active_run != Some(ticket) {
                warn!(
                    run_id = ticket.run_id,
                    document_id = %ticket.document_id,
                    "Discarding results from superseded analysis"
                );
                return Ok(state);
            }
            state.results = Some(result);
            state.analyzing = false;
            state.active_run = None;
        }
    }
    Ok(state)
}

/// Shared, lock-protected review state
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<ReviewState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> ReviewState {
        self.inner.read().await.clone()
    }

    /// Apply one event and return the resulting state
    pub async fn apply(&self, event: ReviewEvent) -> Result<ReviewState, SessionError> {
        let mut guard = self.inner.write().await;
        let before = guard.phase();
        let next = reduce(guard.clone(), event)?;
        if next.phase() != before {
            info!(from = ?before, to = ?next.phase(), "Review phase changed");
        }
        *guard = next.clone();
        Ok(next)
    }

    pub async fn add_documents(&self, documents: Vec<UploadedDocument>) -> ReviewState {
        let count = documents.len();
        // Adding documents cannot fail
        let state = match self.apply(ReviewEvent::DocumentsAdded(documents)).await {
            Ok(state) => state,
            Err(_) => self.snapshot().await,
        };
        debug!(added = count, total = state.documents.len(), "Documents added");
        state
    }

    /// Select a document, returning the ticket for the run to start and the document to analyse
    pub async fn select(
        &self,
        document_id: Uuid,
    ) -> Result<(AnalysisTicket, UploadedDocument), SessionError> {
        let state = self
            .apply(ReviewEvent::DocumentSelected { document_id })
            .await?;
        match (state.active_run, state.selected().cloned()) {
            (Some(ticket), Some(document)) => Ok((ticket, document)),
            _ => Err(SessionError::UnknownDocument(document_id)),
        }
    }

    pub async fn finish(&self, ticket: AnalysisTicket, result: ReviewResult) -> ReviewState {
        match self
            .apply(ReviewEvent::AnalysisFinished { ticket, result })
            .await
        {
            Ok(state) => state,
            Err(_) => self.snapshot().await,
        }
    }
}
