//! EYFS statutory framework reference data (November 2024)

use serde::Serialize;
use shared_types::SectionKey;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkSection {
    pub key: SectionKey,
    pub title: &'static str,
    pub items: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceFramework {
    pub version: &'static str,
    pub sections: [FrameworkSection; 3],
    pub overarching_principles: &'static [&'static str],
}

pub const EYFS_FRAMEWORK: ReferenceFramework = ReferenceFramework {
    version: "EYFS Framework November 2024",
    sections: [
        FrameworkSection {
            key: SectionKey::LearningDevelopment,
            title: "Section 1 - Learning and Development Requirements",
            items: &[
                "Communication and language",
                "Physical development",
                "Personal, social and emotional development",
                "Literacy",
                "Mathematics",
                "Understanding the world",
                "Expressive arts and design",
            ],
        },
        FrameworkSection {
            key: SectionKey::Assessment,
            title: "Section 2 - Assessment",
            items: &[
                "Ongoing assessment",
                "Progress check at age two",
                "Reception Baseline Assessment (RBA)",
                "Early Years Foundation Stage Profile (EYFSP)",
            ],
        },
        FrameworkSection {
            key: SectionKey::SafeguardingWelfare,
            title: "Section 3 - Safeguarding and Welfare Requirements",
            items: &[
                "Safeguarding policies and procedures",
                "Concerns about children's safety and welfare",
                "Suitable people",
                "Staff qualifications, training, support and skills",
                "Key person",
                "Staff:child ratios",
                "Health",
                "Managing behaviour",
                "Safety and suitability of premises, environment and equipment",
                "Special educational needs",
                "Information and records",
                "Complaints procedure",
            ],
        },
    ],
    overarching_principles: &[
        "Every child is a unique child",
        "Children learn through positive relationships",
        "Children learn in enabling environments",
        "Children develop and learn at different rates",
    ],
};

impl ReferenceFramework {
    pub fn section(&self, key: SectionKey) -> &FrameworkSection {
        // Sections are stored in SectionKey::ALL order
        match key {
            SectionKey::LearningDevelopment => &self.sections[0],
            SectionKey::Assessment => &self.sections[1],
            SectionKey::SafeguardingWelfare => &self.sections[2],
        }
    }

    /// Plain-text rendering used inside the analysis prompt
    pub fn reference_text(&self) -> String {
        let mut out = String::from(self.version);
        out.push('\n');
        for section in &self.sections {
            out.push_str(&format!("\n{}\n", section.title));
            for item in section.items {
                out.push_str(&format!("- {}\n", item));
            }
        }
        out.push_str("\nOverarching principles\n");
        for principle in self.overarching_principles {
            out.push_str(&format!("- {}\n", principle));
        }
        out
    }
}
