pub mod analysis;
pub mod outcome;
pub mod types;

pub use analysis::{
    ComplianceAnalysis, ComplianceStatus, NarrativeAnalysis, Priority, SectionKey, SectionResult,
};
pub use outcome::{Outcome, ReviewResult};
pub use types::{DocumentFormat, UploadedDocument};
