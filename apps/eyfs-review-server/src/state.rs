//! Application state shared by every handler

use std::sync::Arc;

use compliance_engine::AnalysisOrchestrator;
use shared_types::UploadedDocument;
use tracing::{info, Instrument};

use crate::session::{AnalysisTicket, SessionStore};

/// Upload size accepted when none is configured
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub struct AppState {
    pub session: SessionStore,
    pub orchestrator: AnalysisOrchestrator,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(orchestrator: AnalysisOrchestrator) -> Self {
        Self {
            session: SessionStore::new(),
            orchestrator,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_upload_limit(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Run the pipeline for a ticket in the background and record the result.
    ///
    /// The orchestrator never fails, so the run always reports back and the
    /// analyzing flag always clears for the active ticket.
    pub fn spawn_analysis(self: &Arc<Self>, ticket: AnalysisTicket, document: UploadedDocument) {
        let state = Arc::clone(self);
        let span = tracing::info_span!("analysis", run_id = ticket.run_id, file_name = %document.name);

        tokio::spawn(
            async move {
                let result = state.orchestrator.analyze(&document).await;
                let after = state.session.finish(ticket, result).await;
                info!(phase = ?after.phase(), "Analysis run finished");
            }
            .instrument(span),
        );
    }
}
