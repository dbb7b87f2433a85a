//! Download packaging for the rendered report

use chrono::{DateTime, Utc};
use shared_types::types::file_stem;
use shared_types::{ComplianceAnalysis, NarrativeAnalysis};
use tracing::debug;

use crate::render::build_report;

/// Word opens HTML content served under this type as a formatted document
pub const REPORT_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A rendered report ready to hand to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportExport {
    pub file_name: String,
    pub mime_type: &'static str,
    pub html: String,
}

impl ReportExport {
    pub fn as_bytes(&self) -> &[u8] {
        self.html.as_bytes()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.html.into_bytes()
    }
}

/// `EYFS_Policy_Review_Narrative_<stem>_<YYYY-MM-DD>.doc`
pub fn report_file_name(source_name: &str, now: DateTime<Utc>) -> String {
    format!(
        "EYFS_Policy_Review_Narrative_{}_{}.doc",
        file_stem(source_name),
        now.format("%Y-%m-%d")
    )
}

pub fn export_report(
    analysis: &ComplianceAnalysis,
    narrative: &NarrativeAnalysis,
    now: DateTime<Utc>,
) -> ReportExport {
    let html = build_report(analysis, narrative, now);
    let file_name = report_file_name(&analysis.file_name, now);
    debug!(%file_name, bytes = html.len(), "Report exported");

    ReportExport {
        file_name,
        mime_type: REPORT_MIME_TYPE,
        html,
    }
}
