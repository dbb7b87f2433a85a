//! Two-stage review pipeline
//!
//! Stage one extracts the policy text and asks for the structured analysis.
//! Stage two asks for a narrative built on top of stage one's result. Each
//! stage degrades to its static fallback on any failure, so [`AnalysisOrchestrator::analyze`]
//! always returns a complete [`ReviewResult`].

use std::sync::Arc;

use document_text::{DocumentTextExtractor, TextExtractor};
use shared_types::{ComplianceAnalysis, NarrativeAnalysis, Outcome, ReviewResult, UploadedDocument};
use tracing::{info, warn};

use crate::client::CompletionClient;
use crate::error::AnalysisError;
use crate::fallback::{fallback_compliance, fallback_narrative};
use crate::framework::{ReferenceFramework, EYFS_FRAMEWORK};
use crate::parser::{parse_compliance_response, parse_narrative_response};
use crate::prompt::{build_compliance_prompt, build_narrative_prompt, CONTENT_UNAVAILABLE};

#[derive(Clone)]
pub struct AnalysisOrchestrator {
    client: Arc<dyn CompletionClient>,
    extractor: Arc<dyn TextExtractor>,
    framework: &'static ReferenceFramework,
}

/// Successful first stage: the parsed analysis and the text it was built from
struct StructuredStage {
    analysis: ComplianceAnalysis,
    policy_text: String,
}

impl AnalysisOrchestrator {
    pub fn new(client: Arc<dyn CompletionClient>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            client,
            extractor,
            framework: &EYFS_FRAMEWORK,
        }
    }

    /// Orchestrator using the built-in Word/PDF/plain-text extractor
    pub fn with_default_extractor(client: Arc<dyn CompletionClient>) -> Self {
        Self::new(client, Arc::new(DocumentTextExtractor::new()))
    }

    pub fn framework(&self) -> &'static ReferenceFramework {
        self.framework
    }

    /// Run both stages for one document. Never fails; degraded stages carry their cause.
    pub async fn analyze(&self, document: &UploadedDocument) -> ReviewResult {
        info!(file_name = %document.name, size = document.size, "Starting policy review");

        let (analysis, policy_text) = match self.structured_stage(document).await {
            Ok(stage) => (Outcome::Ok(stage.analysis), stage.policy_text),
            Err(e) => {
                warn!(file_name = %document.name, error = %e, "Structured analysis failed, using fallback");
                (
                    Outcome::degraded(
                        fallback_compliance(&document.name, document.format),
                        e.to_string(),
                    ),
                    CONTENT_UNAVAILABLE.to_string(),
                )
            }
        };

        let narrative = match self.narrative_stage(analysis.data(), &policy_text).await {
            Ok(narrative) => Outcome::Ok(narrative),
            Err(e) => {
                warn!(file_name = %document.name, error = %e, "Narrative analysis failed, using fallback");
                Outcome::degraded(fallback_narrative(), e.to_string())
            }
        };

        let result = ReviewResult {
            analysis,
            narrative,
        };
        info!(
            file_name = %document.name,
            compliance = result.analysis.data().compliance_percentage,
            degraded = result.is_degraded(),
            "Policy review complete"
        );
        result
    }

    async fn structured_stage(
        &self,
        document: &UploadedDocument,
    ) -> Result<StructuredStage, AnalysisError> {
        let policy_text = self.extract_text(document).await?;
        let prompt = build_compliance_prompt(&policy_text, self.framework);
        let response = self.client.complete(&prompt).await?;
        let analysis = parse_compliance_response(&response, &document.name, document.format)?;

        Ok(StructuredStage {
            analysis,
            policy_text,
        })
    }

    async fn narrative_stage(
        &self,
        analysis: &ComplianceAnalysis,
        policy_text: &str,
    ) -> Result<NarrativeAnalysis, AnalysisError> {
        let prompt = build_narrative_prompt(analysis, policy_text);
        let response = self.client.complete(&prompt).await?;
        parse_narrative_response(&response)
    }

    /// Extraction is CPU-bound (PDF content streams in particular), keep it off the runtime
    async fn extract_text(&self, document: &UploadedDocument) -> Result<String, AnalysisError> {
        let extractor = Arc::clone(&self.extractor);
        let name = document.name.clone();
        let payload = document.payload.clone();

        tokio::task::spawn_blocking(move || extractor.extract(&name, &payload))
            .await
            .map_err(|e| AnalysisError::Task(e.to_string()))?
            .map_err(AnalysisError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ScriptedClient;
    use bytes::Bytes;
    use document_text::ExtractionError;
    use pretty_assertions::assert_eq;
    use shared_types::{ComplianceStatus, SectionKey};
    use std::io::Write;

    const STRUCTURED: &str = r#"{
        "overallCompliance": "Compliant",
        "sections": {
            "assessment": {"status": "Compliant", "issues": [], "score": 88}
        },
        "recommendations": ["Keep the RBA procedure under review"],
        "priorities": ["Low"],
        "compliancePercentage": 91
    }"#;

    const NARRATIVE: &str = r#"{
        "executiveSummary": "Strong policy.",
        "learningDevelopmentNarrative": "LD",
        "assessmentNarrative": "AS",
        "safeguardingWelfareNarrative": "SW",
        "complianceNarrative": "CN",
        "implementationRoadmap": "IR",
        "conclusionNextSteps": "CS",
        "overallScore": 90,
        "strengthsHighlights": ["Clear"],
        "criticalGaps": []
    }"#;

    struct BrokenExtractor;

    impl TextExtractor for BrokenExtractor {
        fn extract(&self, _: &str, _: &[u8]) -> Result<String, ExtractionError> {
            Err(ExtractionError::MissingPart("word/document.xml"))
        }
    }

    fn text_document(name: &str, body: &str) -> UploadedDocument {
        UploadedDocument::new(name, "text/plain", Bytes::from(body.to_string()))
    }

    fn orchestrator(client: Arc<ScriptedClient>) -> AnalysisOrchestrator {
        AnalysisOrchestrator::with_default_extractor(client)
    }

    fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let mut body = String::new();
        for p in paragraphs {
            body.push_str(&format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p));
        }
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        );

        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            writer.start_file("word/document.xml", options).unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[tokio::test]
    async fn test_both_stages_succeed() {
        let client = Arc::new(ScriptedClient::new().respond(STRUCTURED).respond(NARRATIVE));
        let doc = text_document("policy.txt", "We follow the EYFS.");

        let result = orchestrator(client.clone()).analyze(&doc).await;

        assert!(!result.is_degraded());
        let analysis = result.analysis.data();
        assert_eq!(analysis.compliance_percentage, 91);
        assert_eq!(analysis.overall_compliance, ComplianceStatus::Compliant);
        assert_eq!(analysis.sections.len(), 1);
        assert_eq!(analysis.file_name, "policy.txt");
        assert!(analysis.missing_requirements.is_empty());
        assert_eq!(result.narrative.data().overall_score, 90.0);

        let prompts = client.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("We follow the EYFS."));
        assert!(prompts[1].contains("\"compliancePercentage\": 91"));
        assert!(prompts[1].contains("We follow the EYFS...."));
    }

    #[tokio::test]
    async fn test_unreachable_service_yields_both_fallbacks() {
        let client = Arc::new(ScriptedClient::new().fail("offline").fail("offline"));
        let doc = text_document("policy.txt", "Some policy");

        let result = orchestrator(client.clone()).analyze(&doc).await;

        assert!(result.analysis.is_degraded());
        assert!(result.narrative.is_degraded());
        assert_eq!(result.analysis.data().compliance_percentage, 48);
        assert_eq!(
            result.analysis.data().overall_compliance,
            ComplianceStatus::NeedsUpdate
        );
        assert_eq!(result.narrative.data().overall_score, 65.0);
        assert!(client.prompts()[1].contains(CONTENT_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_prose_answer_is_treated_as_failure() {
        let client = Arc::new(
            ScriptedClient::new()
                .respond("Sorry, I cannot help with that.")
                .respond(NARRATIVE),
        );
        let doc = text_document("policy.txt", "text");

        let result = orchestrator(client).analyze(&doc).await;

        assert!(result.analysis.is_degraded());
        assert_eq!(result.analysis.data().compliance_percentage, 48);
        assert!(!result.narrative.is_degraded());
    }

    #[tokio::test]
    async fn test_incomplete_narrative_falls_back() {
        let client = Arc::new(
            ScriptedClient::new()
                .respond(STRUCTURED)
                .respond(r#"{"executiveSummary": "Only this"}"#),
        );
        let doc = text_document("policy.txt", "text");

        let result = orchestrator(client).analyze(&doc).await;

        assert!(!result.analysis.is_degraded());
        assert!(result.narrative.is_degraded());
        assert_eq!(result.narrative.data().overall_score, 65.0);
    }

    #[tokio::test]
    async fn test_extraction_failure_skips_first_call() {
        let client = Arc::new(ScriptedClient::new().respond(NARRATIVE));
        let orchestrator = AnalysisOrchestrator::new(client.clone(), Arc::new(BrokenExtractor));
        let doc = text_document("broken.docx", "not a zip");

        let result = orchestrator.analyze(&doc).await;

        assert!(result.analysis.is_degraded());
        assert!(result.analysis.cause().unwrap().contains("word/document.xml"));
        let prompts = client.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(CONTENT_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_docx_text_reaches_the_prompt() {
        let client = Arc::new(ScriptedClient::new().respond(STRUCTURED).respond(NARRATIVE));
        let payload = docx_bytes(&["Safeguarding policy", "Our DSL is Jane Smith."]);
        let doc = UploadedDocument::new(
            "Safeguarding.docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Bytes::from(payload),
        );

        let result = orchestrator(client.clone()).analyze(&doc).await;

        assert!(!result.is_degraded());
        assert_eq!(
            result.analysis.data().file_format,
            shared_types::DocumentFormat::Word
        );
        assert!(client.prompts()[0].contains("Our DSL is Jane Smith."));
        assert!(result
            .analysis
            .data()
            .section(SectionKey::Assessment)
            .is_some());
    }
}
