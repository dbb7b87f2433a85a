//! Review report rendering
//!
//! The report is a single self-contained HTML document with embedded styling.
//! It is delivered under a Word MIME type with a `.doc` name, which Word opens
//! as a formatted document.
//!
//! - [`render`]: `build_report`, a pure function of the two records and a timestamp
//! - [`export`]: file naming and MIME type for the download

pub mod export;
pub mod render;
mod styles;

pub use export::{export_report, report_file_name, ReportExport, REPORT_MIME_TYPE};
pub use render::build_report;
