//! EYFS policy analysis
//!
//! The judgement itself is delegated to an external completion service. This
//! crate owns everything around that call:
//!
//! - [`framework`]: the static EYFS reference data
//! - [`prompt`]: the two prompt templates
//! - [`client`]: the `complete(prompt) -> text` seam and a scripted fake
//! - [`anthropic`]: the production HTTP client
//! - [`parser`]: lenient JSON parsing with per-field defaults
//! - [`fallback`]: the static records substituted when a stage fails
//! - [`orchestrator`]: the two-stage pipeline tying it together

pub mod anthropic;
pub mod client;
pub mod error;
pub mod fallback;
pub mod framework;
pub mod orchestrator;
pub mod parser;
pub mod prompt;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use client::{CompletionClient, ScriptedClient};
pub use error::{AnalysisError, CompletionError};
pub use framework::{FrameworkSection, ReferenceFramework, EYFS_FRAMEWORK};
pub use orchestrator::AnalysisOrchestrator;
