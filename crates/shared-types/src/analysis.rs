//! Analysis records produced by the review pipeline
//!
//! Both records use camelCase on the wire because that is the JSON shape the
//! completion service is asked to produce.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::DocumentFormat;

/// Overall or per-section compliance verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum ComplianceStatus {
    Compliant,
    #[default]
    #[serde(rename = "Needs Update")]
    NeedsUpdate,
    Critical,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "Compliant",
            ComplianceStatus::NeedsUpdate => "Needs Update",
            ComplianceStatus::Critical => "Critical",
        }
    }

    /// Map a free-form label onto the closed set; anything unknown is `Needs Update`.
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "compliant" => ComplianceStatus::Compliant,
            "critical" => ComplianceStatus::Critical,
            _ => ComplianceStatus::NeedsUpdate,
        }
    }
}

impl From<String> for ComplianceStatus {
    fn from(label: String) -> Self {
        Self::parse_lenient(&label)
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority label attached to a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

impl From<String> for Priority {
    fn from(label: String) -> Self {
        Self::parse_lenient(&label)
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three framework sections a policy is scored against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    LearningDevelopment,
    Assessment,
    SafeguardingWelfare,
}

impl SectionKey {
    pub const ALL: [SectionKey; 3] = [
        SectionKey::LearningDevelopment,
        SectionKey::Assessment,
        SectionKey::SafeguardingWelfare,
    ];

    /// Key used in the JSON payload
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::LearningDevelopment => "learningDevelopment",
            SectionKey::Assessment => "assessment",
            SectionKey::SafeguardingWelfare => "safeguardingWelfare",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionKey::LearningDevelopment => "Learning and Development Requirements",
            SectionKey::Assessment => "Assessment Requirements",
            SectionKey::SafeguardingWelfare => "Safeguarding and Welfare Requirements",
        }
    }

    /// Score assumed when the service omits this section
    pub fn default_score(&self) -> u8 {
        match self {
            SectionKey::LearningDevelopment => 60,
            SectionKey::Assessment => 40,
            SectionKey::SafeguardingWelfare => 45,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionResult {
    pub status: ComplianceStatus,
    pub issues: Vec<String>,
    /// 0-100
    pub score: u8,
}

/// Structured result of the first completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceAnalysis {
    pub file_name: String,
    pub file_format: DocumentFormat,
    pub overall_compliance: ComplianceStatus,
    /// Sections the service reported on; may be missing keys
    pub sections: BTreeMap<SectionKey, SectionResult>,
    pub missing_requirements: Vec<String>,
    pub outdated_content: Vec<String>,
    pub recommendations: Vec<String>,
    /// Parallel to `recommendations`; may be shorter
    pub priorities: Vec<Priority>,
    pub compliance_percentage: u8,
}

impl ComplianceAnalysis {
    pub fn section(&self, key: SectionKey) -> Option<&SectionResult> {
        self.sections.get(&key)
    }

    /// Priority for the recommendation at `index`, `Medium` when unlisted
    pub fn priority_for(&self, index: usize) -> Priority {
        self.priorities.get(index).copied().unwrap_or_default()
    }
}

/// Long-form elaboration produced by the second completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeAnalysis {
    pub executive_summary: String,
    pub learning_development_narrative: String,
    pub assessment_narrative: String,
    pub safeguarding_welfare_narrative: String,
    pub compliance_narrative: String,
    pub implementation_roadmap: String,
    pub conclusion_next_steps: String,
    pub overall_score: f64,
    pub strengths_highlights: Vec<String>,
    pub critical_gaps: Vec<String>,
}

impl NarrativeAnalysis {
    pub fn section_narrative(&self, key: SectionKey) -> &str {
        match key {
            SectionKey::LearningDevelopment => &self.learning_development_narrative,
            SectionKey::Assessment => &self.assessment_narrative,
            SectionKey::SafeguardingWelfare => &self.safeguarding_welfare_narrative,
        }
    }
}
