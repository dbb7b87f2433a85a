//! Parsing completion text into analysis records
//!
//! The structured stage is lenient: each field falls back to its own default
//! when missing or mistyped. The narrative stage is strict: the object must
//! deserialize completely or the whole stage counts as failed.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use shared_types::{
    ComplianceAnalysis, ComplianceStatus, DocumentFormat, NarrativeAnalysis, Priority, SectionKey,
    SectionResult,
};

use crate::error::AnalysisError;

/// Percentage assumed when the service omits `compliancePercentage`
pub const DEFAULT_COMPLIANCE_PERCENTAGE: u8 = 65;

/// Strip whitespace and a single surrounding markdown code fence
pub fn json_payload(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop an info string such as `json` on the opening fence line
    match body.find('\n') {
        Some(newline) if !body[..newline].contains('{') => body[newline + 1..].trim(),
        _ => body.trim(),
    }
}

fn parse_object(response: &str) -> Result<Map<String, Value>, AnalysisError> {
    let value: Value = serde_json::from_str(json_payload(response))
        .map_err(|e| AnalysisError::JsonParsing(e.to_string()))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(AnalysisError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse the structured-analysis response, defaulting each field independently
pub fn parse_compliance_response(
    response: &str,
    file_name: &str,
    file_format: DocumentFormat,
) -> Result<ComplianceAnalysis, AnalysisError> {
    let raw = parse_object(response)?;

    let overall_compliance = raw
        .get("overallCompliance")
        .and_then(Value::as_str)
        .map(ComplianceStatus::parse_lenient)
        .unwrap_or_default();

    let sections = raw
        .get("sections")
        .and_then(Value::as_object)
        .map(parse_sections)
        .unwrap_or_default();

    let priorities = priority_list(raw.get("priorities"));

    let compliance_percentage = raw
        .get("compliancePercentage")
        .and_then(score_value)
        .unwrap_or(DEFAULT_COMPLIANCE_PERCENTAGE);

    Ok(ComplianceAnalysis {
        file_name: file_name.to_string(),
        file_format,
        overall_compliance,
        sections,
        missing_requirements: string_list(raw.get("missingRequirements")),
        outdated_content: string_list(raw.get("outdatedContent")),
        recommendations: string_list(raw.get("recommendations")),
        priorities,
        compliance_percentage,
    })
}

/// Keep only the known section keys whose value is an object
fn parse_sections(raw: &Map<String, Value>) -> BTreeMap<SectionKey, SectionResult> {
    raw.iter()
        .filter_map(|(key, value)| {
            let key = SectionKey::from_key(key)?;
            let section = value.as_object()?;
            Some((
                key,
                SectionResult {
                    status: section
                        .get("status")
                        .and_then(Value::as_str)
                        .map(ComplianceStatus::parse_lenient)
                        .unwrap_or_default(),
                    issues: string_list(section.get("issues")),
                    score: section
                        .get("score")
                        .and_then(score_value)
                        .unwrap_or_else(|| key.default_score()),
                },
            ))
        })
        .collect()
}

/// Array of strings, skipping anything that is not a string
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value.and_then(Value::as_array) {
        None => vec![],
        Some(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
    }
}

/// Priorities stay index-aligned with recommendations, so a non-string slot
/// becomes `Medium` rather than being dropped
fn priority_list(value: Option<&Value>) -> Vec<Priority> {
    match value.and_then(Value::as_array) {
        None => vec![],
        Some(items) => items
            .iter()
            .map(|v| v.as_str().map(Priority::parse_lenient).unwrap_or_default())
            .collect(),
    }
}

/// A 0-100 score from a number or numeric string, rounded and clamped
fn score_value(value: &Value) -> Option<u8> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.round().clamp(0.0, 100.0) as u8)
}

/// Parse the narrative response; every field must be present
pub fn parse_narrative_response(response: &str) -> Result<NarrativeAnalysis, AnalysisError> {
    let raw = parse_object(response)?;
    serde_json::from_value(Value::Object(raw))
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const FULL_RESPONSE: &str = r#"{
        "overallCompliance": "Compliant",
        "sections": {
            "learningDevelopment": {"status": "Compliant", "issues": [], "score": 92},
            "assessment": {"status": "Needs Update", "issues": ["RBA missing"], "score": 71.6},
            "safeguardingWelfare": {"status": "Critical", "issues": ["No DSL named"], "score": 30}
        },
        "missingRequirements": ["Designated safeguarding lead"],
        "outdatedContent": ["2021 framework references"],
        "recommendations": ["Name a DSL", "Add RBA procedure"],
        "priorities": ["High", "Medium"],
        "compliancePercentage": 64
    }"#;

    #[test]
    fn test_full_response_parses() {
        let analysis =
            parse_compliance_response(FULL_RESPONSE, "policy.docx", DocumentFormat::Word).unwrap();
        assert_eq!(analysis.overall_compliance, ComplianceStatus::Compliant);
        assert_eq!(analysis.compliance_percentage, 64);
        assert_eq!(analysis.sections.len(), 3);
        let assessment = analysis.section(SectionKey::Assessment).unwrap();
        assert_eq!(assessment.score, 72);
        assert_eq!(assessment.issues, vec!["RBA missing".to_string()]);
        assert_eq!(analysis.priorities, vec![Priority::High, Priority::Medium]);
        assert_eq!(analysis.file_name, "policy.docx");
    }

    #[test]
    fn test_missing_fields_default_independently() {
        let analysis = parse_compliance_response(
            r#"{"recommendations": ["Review ratios"]}"#,
            "p.docx",
            DocumentFormat::Word,
        )
        .unwrap();
        assert_eq!(analysis.overall_compliance, ComplianceStatus::NeedsUpdate);
        assert!(analysis.sections.is_empty());
        assert!(analysis.missing_requirements.is_empty());
        assert!(analysis.outdated_content.is_empty());
        assert!(analysis.priorities.is_empty());
        assert_eq!(analysis.recommendations, vec!["Review ratios".to_string()]);
        assert_eq!(analysis.compliance_percentage, DEFAULT_COMPLIANCE_PERCENTAGE);
    }

    #[test]
    fn test_unknown_sections_and_bad_items_are_skipped() {
        let analysis = parse_compliance_response(
            r#"{"sections": {"welfare": {"score": 10}, "assessment": "bad", "learningDevelopment": {}},
                "outdatedContent": ["ok", 3, null]}"#,
            "p.docx",
            DocumentFormat::Word,
        )
        .unwrap();
        assert_eq!(analysis.sections.len(), 1);
        let section = analysis.section(SectionKey::LearningDevelopment).unwrap();
        assert_eq!(section.score, 60);
        assert_eq!(section.status, ComplianceStatus::NeedsUpdate);
        assert_eq!(analysis.outdated_content, vec!["ok".to_string()]);
    }

    #[test]
    fn test_non_string_priority_keeps_its_slot() {
        let analysis = parse_compliance_response(
            r#"{"recommendations": ["a", "b", "c"], "priorities": ["High", null, "Low"]}"#,
            "p.docx",
            DocumentFormat::Word,
        )
        .unwrap();
        assert_eq!(
            analysis.priorities,
            vec![Priority::High, Priority::Medium, Priority::Low]
        );
        assert_eq!(analysis.priority_for(1), Priority::Medium);
        assert_eq!(analysis.priority_for(2), Priority::Low);
    }

    #[test]
    fn test_not_json_is_an_error() {
        let err = parse_compliance_response("I could not analyse this.", "p", DocumentFormat::Word)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::JsonParsing(_)));
    }

    #[test]
    fn test_non_object_json_is_an_error() {
        let err = parse_compliance_response("[1, 2]", "p", DocumentFormat::Word).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn test_fenced_json_is_unwrapped() {
        assert_eq!(json_payload("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(json_payload("```{\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(json_payload("  {\"a\": 1}  "), "{\"a\": 1}");
        assert_eq!(json_payload("```json\n{\"a\": 1}"), "```json\n{\"a\": 1}");
    }

    #[test]
    fn test_narrative_requires_every_field() {
        let err = parse_narrative_response(r#"{"executiveSummary": "Good"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn test_narrative_parses_complete_object() {
        let narrative = parse_narrative_response(
            r#"{
                "executiveSummary": "Summary",
                "learningDevelopmentNarrative": "LD",
                "assessmentNarrative": "AS",
                "safeguardingWelfareNarrative": "SW",
                "complianceNarrative": "CN",
                "implementationRoadmap": "IR",
                "conclusionNextSteps": "CS",
                "overallScore": 78,
                "strengthsHighlights": ["Clear ratios"],
                "criticalGaps": ["No RBA"]
            }"#,
        )
        .unwrap();
        assert_eq!(narrative.overall_score, 78.0);
        assert_eq!(narrative.section_narrative(SectionKey::Assessment), "AS");
    }

    proptest! {
        #[test]
        fn numeric_scores_are_clamped(score in -500.0f64..500.0) {
            let value = serde_json::json!(score);
            let parsed = score_value(&value).unwrap();
            prop_assert!(parsed <= 100);
        }

        #[test]
        fn arbitrary_text_never_panics(text in ".{0,200}") {
            let _ = parse_compliance_response(&text, "p", DocumentFormat::Word);
            let _ = parse_narrative_response(&text);
        }
    }
}
