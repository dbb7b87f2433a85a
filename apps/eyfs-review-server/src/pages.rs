//! Server-rendered review page
//!
//! One page shows the upload form, the uploaded documents, the current phase
//! and, once ready, a summary of the results with the export link. Actions go
//! through the JSON API with `fetch` and then reload the page.

use std::sync::Arc;

use axum::{extract::State, response::Html};
use compliance_engine::ReferenceFramework;
use shared_types::{ComplianceStatus, ReviewResult, SectionKey, UploadedDocument};

use crate::session::{Phase, ReviewState};
use crate::state::AppState;

/// Handler: GET /
pub async fn handle_index(State(state): State<Arc<AppState>>) -> Html<String> {
    let snapshot = state.session.snapshot().await;
    Html(render_index(&snapshot, state.orchestrator.framework()))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Colour band for a 0-100 score
fn score_class(score: f64) -> &'static str {
    if score >= 80.0 {
        "score-good"
    } else if score >= 60.0 {
        "score-fair"
    } else {
        "score-poor"
    }
}

fn badge_class(status: ComplianceStatus) -> &'static str {
    match status {
        ComplianceStatus::Compliant => "badge badge-compliant",
        ComplianceStatus::NeedsUpdate => "badge badge-update",
        ComplianceStatus::Critical => "badge badge-critical",
    }
}

fn document_list(state: &ReviewState) -> String {
    if state.documents.is_empty() {
        return r#"<p class="empty">No files uploaded yet</p>"#.to_string();
    }

    state
        .documents
        .iter()
        .map(|doc| document_row(doc, state.selected_document == Some(doc.id)))
        .collect()
}

fn document_row(doc: &UploadedDocument, selected: bool) -> String {
    format!(
        r#"
        <div class="document{selected}">
            <div>
                <span class="doc-name">{name}</span>
                <span class="doc-format">{format} Document</span>
            </div>
            <span class="doc-size">{size:.1} KB</span>
            <button onclick="selectDocument('{id}')">Review</button>
        </div>"#,
        selected = if selected { " selected" } else { "" },
        name = escape(&doc.name),
        format = doc.format,
        size = doc.size as f64 / 1024.0,
        id = doc.id,
    )
}

fn list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", escape(item)))
        .collect()
}

fn degraded_notice(results: &ReviewResult) -> String {
    let causes: Vec<String> = [
        results.analysis.cause().map(|c| format!("Structured analysis: {}", c)),
        results.narrative.cause().map(|c| format!("Narrative: {}", c)),
    ]
    .into_iter()
    .flatten()
    .collect();

    if causes.is_empty() {
        return String::new();
    }
    format!(
        r#"
        <div class="notice">
            <strong>The completion service could not be used for every stage; standard guidance is shown instead.</strong>
            <ul>{}</ul>
        </div>"#,
        list(&causes)
    )
}

fn results_panel(results: &ReviewResult) -> String {
    let analysis = results.analysis.data();
    let narrative = results.narrative.data();

    let sections: String = SectionKey::ALL
        .iter()
        .filter_map(|key| analysis.section(*key).map(|s| (key, s)))
        .map(|(key, section)| {
            format!(
                r#"
            <div class="section-row">
                <h4>{title}</h4>
                <span class="{score_class}">{score}/100</span>
                <span class="{badge}">{status}</span>
                <ul>{issues}</ul>
            </div>"#,
                title = key.title(),
                score_class = score_class(f64::from(section.score)),
                score = section.score,
                badge = badge_class(section.status),
                status = section.status,
                issues = list(&section.issues),
            )
        })
        .collect();

    let recommendations: String = analysis
        .recommendations
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let priority = analysis.priority_for(i);
            format!(
                r#"<li class="priority-{}"><strong>{}</strong>: {}</li>"#,
                priority.as_str().to_lowercase(),
                priority,
                escape(rec)
            )
        })
        .collect();

    format!(
        r#"
    <section class="card">
        <div class="results-header">
            <h2>Comprehensive Analysis Results</h2>
            <a class="button" href="/api/report">Export Narrative Report</a>
        </div>{notice}
        <div class="summary-grid">
            <div><h4>Document</h4><p>{file_name}</p><p>{file_format} Format</p></div>
            <div><h4>Overall Score</h4><p class="{overall_class}">{overall_score}/100</p></div>
            <div><h4>Compliance Status</h4><p><span class="{badge}">{status}</span></p><p>{percentage}%</p></div>
            <div><h4>Framework</h4><p>November 2024</p><p>Latest EYFS</p></div>
        </div>
        <h3>Executive Summary</h3>
        <p>{summary}</p>
        <div class="two-col">
            <div><h3>Key Strengths</h3><ul>{strengths}</ul></div>
            <div><h3>Critical Gaps</h3><ul>{gaps}</ul></div>
        </div>
        <h3>EYFS Section Compliance</h3>{sections}
        <h3>Implementation Roadmap</h3>
        <p>{roadmap}</p>
        <h3>Priority Recommendations</h3>
        <ul>{recommendations}</ul>
    </section>"#,
        notice = degraded_notice(results),
        file_name = escape(&analysis.file_name),
        file_format = analysis.file_format,
        overall_class = score_class(narrative.overall_score),
        overall_score = narrative.overall_score,
        badge = badge_class(analysis.overall_compliance),
        status = analysis.overall_compliance,
        percentage = analysis.compliance_percentage,
        summary = escape(&narrative.executive_summary),
        strengths = list(&narrative.strengths_highlights),
        gaps = list(&narrative.critical_gaps),
        sections = sections,
        roadmap = escape(&narrative.implementation_roadmap),
        recommendations = recommendations,
    )
}

fn status_panel(state: &ReviewState) -> String {
    match (state.phase(), &state.results) {
        (Phase::Analyzing, _) => r#"
    <section class="card analyzing">
        <h3>Analyzing Policy...</h3>
        <p>Reviewing document against EYFS statutory framework</p>
        <p>Generating comprehensive narrative analysis...</p>
    </section>"#
            .to_string(),
        (Phase::ResultsReady, Some(results)) => results_panel(results),
        _ => r#"
    <section class="card">
        <h3>Select a policy document to begin</h3>
        <p>Upload a Word document and choose Review to analyse it against the EYFS framework.</p>
    </section>"#
            .to_string(),
    }
}

fn framework_panel(framework: &ReferenceFramework) -> String {
    let sections: String = framework
        .sections
        .iter()
        .map(|section| {
            let items: String = section
                .items
                .iter()
                .map(|item| format!("<li>{}</li>", item))
                .collect();
            format!("<h4>{}</h4><ul>{}</ul>", section.title, items)
        })
        .collect();

    format!(
        r#"
    <section class="card framework">
        <h3>{version}</h3>{sections}
    </section>"#,
        version = framework.version,
        sections = sections,
    )
}

pub fn render_index(state: &ReviewState, framework: &ReferenceFramework) -> String {
    // Keep polling while a run is in flight
    let refresh = if state.analyzing {
        r#"<meta http-equiv="refresh" content="3">"#
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    {refresh}
    <title>EYFS Policy Review System</title>
    <style>{css}</style>
</head>
<body>
    <header>
        <h1>EYFS Policy Review System</h1>
        <p>Comprehensive policy analysis with narrative assessment against EYFS statutory framework</p>
        <span class="branding">Ready To Learn, Ready For Life</span>
    </header>
    <main>
        <aside>
            <section class="card">
                <h2>Upload Policy Documents</h2>
                <form id="upload-form">
                    <input type="file" name="file" multiple accept=".doc,.docx" id="file-upload">
                    <p class="hint">Microsoft Word (.doc, .docx) policy documents</p>
                    <button type="submit">Upload</button>
                </form>
            </section>
            <section class="card">
                <h3>Uploaded Documents</h3>{documents}
            </section>
        </aside>
        <div class="results">{status}{framework}
        </div>
    </main>
    <script>{script}</script>
</body>
</html>
"#,
        refresh = refresh,
        css = PAGE_CSS,
        documents = document_list(state),
        status = status_panel(state),
        framework = framework_panel(framework),
        script = PAGE_SCRIPT,
    )
}

const PAGE_SCRIPT: &str = r#"
document.getElementById('upload-form').addEventListener('submit', async (event) => {
    event.preventDefault();
    const data = new FormData(event.target);
    await fetch('/api/documents', { method: 'POST', body: data });
    window.location.reload();
});
async function selectDocument(id) {
    await fetch('/api/documents/' + id + '/select', { method: 'POST' });
    window.location.reload();
}
"#;

const PAGE_CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #FFF7ED; color: #1F2937; }
header { text-align: center; padding: 32px 16px 16px; }
header h1 { margin: 0 0 8px; font-size: 32px; }
.branding { color: #EF4444; font-weight: 600; background: white; padding: 6px 14px; border-radius: 999px; }
main { display: grid; grid-template-columns: 1fr 2fr; gap: 24px; max-width: 1200px; margin: 0 auto; padding: 24px; }
.card { background: white; border-radius: 16px; padding: 20px; margin-bottom: 20px; box-shadow: 0 2px 8px rgba(0,0,0,0.06); }
.document { display: flex; justify-content: space-between; align-items: center; gap: 8px; padding: 10px; border: 2px solid #E5E7EB; border-radius: 12px; margin-bottom: 8px; }
.document.selected { border-color: #FB923C; background: #FFF7ED; }
.doc-name { display: block; font-weight: 600; }
.doc-format, .doc-size, .hint, .empty { font-size: 12px; color: #6B7280; }
.summary-grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 12px; }
.two-col { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }
.results-header { display: flex; justify-content: space-between; align-items: center; }
.button, button { background: #F97316; color: white; border: none; border-radius: 8px; padding: 8px 14px; text-decoration: none; cursor: pointer; }
.badge { padding: 2px 10px; border-radius: 999px; font-size: 12px; font-weight: 600; }
.badge-compliant { background: #DCFCE7; color: #166534; }
.badge-update { background: #FEF9C3; color: #854D0E; }
.badge-critical { background: #FEE2E2; color: #991B1B; }
.score-good { color: #16A34A; font-weight: 700; }
.score-fair { color: #CA8A04; font-weight: 700; }
.score-poor { color: #DC2626; font-weight: 700; }
.priority-high { border-left: 4px solid #EF4444; padding-left: 8px; }
.priority-medium { border-left: 4px solid #F59E0B; padding-left: 8px; }
.priority-low { border-left: 4px solid #10B981; padding-left: 8px; }
.notice { background: #FEF3C7; border: 1px solid #F59E0B; border-radius: 12px; padding: 12px; margin: 12px 0; }
.analyzing { text-align: center; }
"#;
