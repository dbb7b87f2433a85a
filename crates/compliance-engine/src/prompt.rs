//! Prompt templates for the two completion calls

use shared_types::ComplianceAnalysis;

use crate::framework::ReferenceFramework;

/// Characters of policy text carried into the narrative prompt
pub const NARRATIVE_EXTRACT_CHARS: usize = 2000;

/// Stand-in policy text for the narrative when the first stage failed
pub const CONTENT_UNAVAILABLE: &str = "Policy content not available";

/// Structured compliance analysis prompt.
///
/// The policy text is embedded verbatim; the service is asked to answer with
/// nothing but the JSON object described at the end.
pub fn build_compliance_prompt(policy_text: &str, framework: &ReferenceFramework) -> String {
    format!(
        r#"
You are an EYFS compliance expert. Analyze this early years policy document against the current EYFS statutory framework (effective November 2024).

POLICY DOCUMENT CONTENT:
{policy_text}

FRAMEWORK REFERENCE:
{reference}
ANALYSIS REQUIREMENTS:
1. Check compliance with Section 1 (Learning and Development Requirements)
2. Check compliance with Section 2 (Assessment Requirements)
3. Check compliance with Section 3 (Safeguarding and Welfare Requirements)
4. Identify missing mandatory requirements
5. Flag outdated content that needs updating
6. Provide specific recommendations for improvements

EYFS FRAMEWORK AREAS TO CHECK:
- Seven areas of learning and development
- Assessment procedures (ongoing, age 2 check, RBA, EYFSP)
- Safeguarding policies and procedures
- Staff qualifications and ratios
- Health and safety requirements
- Information and records
- Complaints procedures

Respond ONLY with valid JSON in this exact format:
{{
  "overallCompliance": "Compliant|Needs Update|Critical",
  "sections": {{
    "learningDevelopment": {{
      "status": "Compliant|Needs Update|Critical",
      "issues": ["list of specific issues found"],
      "score": number out of 100
    }},
    "assessment": {{
      "status": "Compliant|Needs Update|Critical",
      "issues": ["list of specific issues found"],
      "score": number out of 100
    }},
    "safeguardingWelfare": {{
      "status": "Compliant|Needs Update|Critical",
      "issues": ["list of specific issues found"],
      "score": number out of 100
    }}
  }},
  "missingRequirements": ["list of missing mandatory requirements"],
  "outdatedContent": ["list of outdated content that needs updating"],
  "recommendations": ["list of specific actionable recommendations"],
  "priorities": ["High", "Medium", "Low"],
  "compliancePercentage": number out of 100
}}

DO NOT include any text outside the JSON structure.
"#,
        policy_text = policy_text,
        reference = framework.reference_text(),
    )
}

/// Narrative elaboration prompt built on top of the structured result
pub fn build_narrative_prompt(analysis: &ComplianceAnalysis, policy_text: &str) -> String {
    let analysis_json =
        serde_json::to_string_pretty(analysis).unwrap_or_else(|_| "{}".to_string());
    let extract = policy_extract(policy_text);

    format!(
        r#"
You are an expert EYFS policy consultant. Based on the technical analysis provided, write a comprehensive narrative analysis of this policy document. This narrative will be included in a professional Word report.

TECHNICAL ANALYSIS DATA:
{analysis_json}

POLICY CONTENT EXTRACT:
{extract}...

Write a professional narrative analysis that includes:

1. EXECUTIVE SUMMARY (2-3 paragraphs)
- Overall assessment of the policy's alignment with EYFS requirements
- Key strengths and critical areas for improvement
- Priority recommendations for immediate action

2. DETAILED SECTION ANALYSIS (3-4 paragraphs each)
- Learning and Development Requirements analysis
- Assessment Requirements analysis
- Safeguarding and Welfare Requirements analysis
- For each section, provide specific examples from the policy and cite missing elements

3. COMPLIANCE NARRATIVE (2-3 paragraphs)
- Discussion of overall compliance status
- Risk assessment of non-compliance areas
- Timeline recommendations for addressing issues

4. IMPLEMENTATION ROADMAP (2-3 paragraphs)
- Prioritized action plan
- Resource requirements
- Timeline for full compliance

5. CONCLUSION AND NEXT STEPS (1-2 paragraphs)
- Summary of key findings
- Immediate actions required
- Long-term sustainability recommendations

Respond with a JSON object containing the narrative sections:
{{
  "executiveSummary": "narrative text",
  "learningDevelopmentNarrative": "narrative text",
  "assessmentNarrative": "narrative text",
  "safeguardingWelfareNarrative": "narrative text",
  "complianceNarrative": "narrative text",
  "implementationRoadmap": "narrative text",
  "conclusionNextSteps": "narrative text",
  "overallScore": number out of 100,
  "strengthsHighlights": ["key strength 1", "key strength 2", "key strength 3"],
  "criticalGaps": ["critical gap 1", "critical gap 2", "critical gap 3"]
}}

Write in a professional, consultative tone suitable for senior leadership. Be specific about EYFS requirements and provide actionable insights.
"#,
        analysis_json = analysis_json,
        extract = extract,
    )
}

/// First [`NARRATIVE_EXTRACT_CHARS`] characters, cut on a char boundary
pub fn policy_extract(policy_text: &str) -> &str {
    match policy_text.char_indices().nth(NARRATIVE_EXTRACT_CHARS) {
        Some((idx, _)) => &policy_text[..idx],
        None => policy_text,
    }
}
