//! HTML report assembly
//!
//! Every string from the analysis records is interpolated as-is. Completion
//! output containing markup will render as markup.

use chrono::{DateTime, Utc};
use shared_types::{ComplianceAnalysis, ComplianceStatus, NarrativeAnalysis, SectionKey};

use crate::styles::REPORT_CSS;

const BRANDING: &str = "Ready To Learn, Ready For Life";

/// CSS class for a status label: lowercased, first space replaced by `-`
pub fn status_class(status: ComplianceStatus) -> String {
    format!(
        "status-{}",
        status.as_str().to_lowercase().replacen(' ', "-", 1)
    )
}

/// Class used when a section is absent from the analysis
fn missing_section_class(key: SectionKey) -> &'static str {
    match key {
        SectionKey::LearningDevelopment => "status-update",
        SectionKey::Assessment | SectionKey::SafeguardingWelfare => "status-critical",
    }
}

fn list_items(items: &[String], strong: bool) -> String {
    items
        .iter()
        .map(|item| {
            if strong {
                format!("<li><strong>{}</strong></li>", item)
            } else {
                format!("<li>{}</li>", item)
            }
        })
        .collect()
}

fn section_block(
    analysis: &ComplianceAnalysis,
    narrative: &NarrativeAnalysis,
    key: SectionKey,
) -> String {
    let section = analysis.section(key);
    let (class, score) = match section {
        Some(s) => (status_class(s.status), s.score),
        None => (missing_section_class(key).to_string(), key.default_score()),
    };

    let issues = match section {
        Some(s) if !s.issues.is_empty() => format!(
            r#"
                <div class="subsection-title">Specific Issues Identified:</div>
                <ul>
                    {}
                </ul>"#,
            list_items(&s.issues, false)
        ),
        _ => String::new(),
    };

    format!(
        r#"
            <div class="narrative-section">
                <h3>{title}</h3>
                <div class="section-score {class}">{score}/100</div>
                <div class="narrative-text">{text}</div>{issues}
            </div>
"#,
        title = key.title(),
        class = class,
        score = score,
        text = narrative.section_narrative(key),
        issues = issues,
    )
}

fn recommendations(analysis: &ComplianceAnalysis) -> String {
    analysis
        .recommendations
        .iter()
        .enumerate()
        .map(|(index, rec)| {
            let priority = analysis.priority_for(index);
            format!(
                r#"
                <div class="recommendation-item priority-{class}">
                    <h4>Priority: {priority}</h4>
                    <p>{rec}</p>
                </div>"#,
                class = priority.as_str().to_lowercase(),
                priority = priority,
                rec = rec,
            )
        })
        .collect()
}

/// Render the full report document.
///
/// Pure: equal inputs and timestamp always give byte-identical output.
pub fn build_report(
    analysis: &ComplianceAnalysis,
    narrative: &NarrativeAnalysis,
    generated_at: DateTime<Utc>,
) -> String {
    let date = generated_at.format("%d/%m/%Y").to_string();
    let time = generated_at.format("%H:%M:%S").to_string();

    let sections: String = SectionKey::ALL
        .iter()
        .map(|key| section_block(analysis, narrative, *key))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>EYFS Policy Review Report - Comprehensive Analysis</title>
    <style>{css}</style>
</head>
<body>
    <div class="header">
        <div class="title">EYFS Policy Review Report</div>
        <div class="subtitle">Comprehensive Analysis with Narrative Assessment</div>
        <div class="subtitle">Generated: {date} at {time}</div>
        <div class="branding">{branding}</div>
    </div>

    <div class="section">
        <div class="section-title">Executive Summary</div>
        <div class="score-box">
            <div class="score-number">{overall_score}/100</div>
            <div class="score-label">Overall Compliance Score</div>
        </div>
        <div class="narrative-text">{executive_summary}</div>
    </div>

    <div class="section">
        <div class="section-title">Document Overview</div>
        <div class="compliance-grid">
            <div class="compliance-item">
                <h4>Policy Document</h4>
                <p>{file_name}</p>
                <p>Format: {file_format}</p>
                <p>Analysis Date: {date}</p>
            </div>
            <div class="compliance-item">
                <h4>Compliance Status</h4>
                <p class="{status_class}">{status}</p>
                <p>Score: {percentage}%</p>
            </div>
            <div class="compliance-item">
                <h4>Framework Version</h4>
                <p>EYFS November 2024</p>
                <p>Latest Statutory Requirements</p>
            </div>
        </div>
    </div>

    <div class="section">
        <div class="section-title">Key Strengths</div>
        <div class="highlights-box">
            <ul>
                {strengths}
            </ul>
        </div>
    </div>

    <div class="section">
        <div class="section-title">Critical Gaps</div>
        <div class="gaps-box">
            <ul>
                {gaps}
            </ul>
        </div>
    </div>

    <div class="page-break"></div>

    <div class="section">
        <div class="section-title">Detailed Section Analysis</div>
{sections}
    </div>

    <div class="page-break"></div>

    <div class="section">
        <div class="section-title">Compliance Analysis</div>
        <div class="narrative-section">
            <div class="narrative-text">{compliance_narrative}</div>
        </div>

        <div class="subsection-title">Missing Mandatory Requirements</div>
        <div class="gaps-box">
            <ul>
                {missing}
            </ul>
        </div>

        <div class="subsection-title">Outdated Content Requiring Updates</div>
        <div class="gaps-box">
            <ul>
                {outdated}
            </ul>
        </div>
    </div>

    <div class="section">
        <div class="section-title">Implementation Roadmap</div>
        <div class="narrative-section">
            <div class="narrative-text">{roadmap}</div>
        </div>

        <div class="subsection-title">Priority Recommendations</div>
        <div class="recommendations">{recommendations}
        </div>
    </div>

    <div class="section">
        <div class="section-title">Conclusion and Next Steps</div>
        <div class="narrative-section">
            <div class="narrative-text">{conclusion}</div>
        </div>
    </div>

    <div class="footer">
        <div class="branding">{branding}</div>
        <div class="disclaimer">
            This report provides professional guidance based on EYFS statutory requirements as of November 2024.
            Regular policy reviews are recommended to maintain ongoing compliance.
        </div>
    </div>
</body>
</html>
"#,
        css = REPORT_CSS,
        date = date,
        time = time,
        branding = BRANDING,
        overall_score = narrative.overall_score,
        executive_summary = narrative.executive_summary,
        file_name = analysis.file_name,
        file_format = analysis.file_format,
        status_class = status_class(analysis.overall_compliance),
        status = analysis.overall_compliance,
        percentage = analysis.compliance_percentage,
        strengths = list_items(&narrative.strengths_highlights, true),
        gaps = list_items(&narrative.critical_gaps, true),
        sections = sections,
        compliance_narrative = narrative.compliance_narrative,
        missing = list_items(&analysis.missing_requirements, false),
        outdated = list_items(&analysis.outdated_content, false),
        roadmap = narrative.implementation_roadmap,
        recommendations = recommendations(analysis),
        conclusion = narrative.conclusion_next_steps,
    )
}
