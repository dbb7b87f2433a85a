//! One-shot review of a local file

use std::path::{Path, PathBuf};

use anyhow::Context;
use bytes::Bytes;
use chrono::Utc;
use compliance_engine::AnalysisOrchestrator;
use report_engine::export_report;
use shared_types::{DocumentFormat, UploadedDocument};
use tracing::{info, warn};

fn mime_type_for(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if lower.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else if lower.ends_with(".doc") {
        "application/msword"
    } else if DocumentFormat::from_file_name(name) == DocumentFormat::Pdf {
        "application/pdf"
    } else {
        "text/plain"
    }
}

/// Review `path` and write the report into `out_dir`, returning the report path
pub async fn run(
    path: &Path,
    out_dir: &Path,
    orchestrator: &AnalysisOrchestrator,
) -> anyhow::Result<PathBuf> {
    let payload = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let document = UploadedDocument::new(name.clone(), mime_type_for(&name), Bytes::from(payload));
    let result = orchestrator.analyze(&document).await;

    for (stage, cause) in [
        ("structured analysis", result.analysis.cause()),
        ("narrative", result.narrative.cause()),
    ] {
        match cause {
            Some(cause) => warn!(stage, %cause, "Stage used fallback content"),
            None => info!(stage, "Stage completed"),
        }
    }

    let analysis = result.analysis.data();
    info!(
        file_name = %analysis.file_name,
        status = %analysis.overall_compliance,
        compliance = analysis.compliance_percentage,
        overall_score = result.narrative.data().overall_score,
        "Review complete"
    );

    let export = export_report(analysis, result.narrative.data(), Utc::now());
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let report_path = out_dir.join(&export.file_name);
    tokio::fs::write(&report_path, export.as_bytes())
        .await
        .with_context(|| format!("Failed to write {}", report_path.display()))?;

    info!(path = %report_path.display(), "Report written");
    Ok(report_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use compliance_engine::ScriptedClient;
    use std::sync::Arc;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("eyfs-review-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_type_for("a.DOCX"), "application/vnd.openxmlformats-officedocument.wordprocessingml.document");
        assert_eq!(mime_type_for("a.doc"), "application/msword");
        assert_eq!(mime_type_for("a.pdf"), "application/pdf");
        assert_eq!(mime_type_for("notes"), "text/plain");
    }

    #[tokio::test]
    async fn test_review_writes_fallback_report() {
        let dir = scratch_dir();
        let source = dir.join("policy.txt");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&source, "Our setting follows the EYFS.").unwrap();

        let client = Arc::new(ScriptedClient::new().fail("offline").fail("offline"));
        let orchestrator = AnalysisOrchestrator::with_default_extractor(client);
        let out_dir = dir.join("reports");

        let report = run(&source, &out_dir, &orchestrator).await.unwrap();

        let expected = format!(
            "EYFS_Policy_Review_Narrative_policy_{}.doc",
            Utc::now().format("%Y-%m-%d")
        );
        assert_eq!(report.file_name().unwrap().to_string_lossy(), expected);
        let html = std::fs::read_to_string(&report).unwrap();
        assert!(html.contains("<p>Score: 48%</p>"));
        assert!(html.contains("65/100"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let client = Arc::new(ScriptedClient::new());
        let orchestrator = AnalysisOrchestrator::with_default_extractor(client);
        let missing = scratch_dir().join("nope.docx");

        let err = run(&missing, &scratch_dir(), &orchestrator).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
