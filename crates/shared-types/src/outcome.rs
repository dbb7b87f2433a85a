//! Tagged stage results
//!
//! Every pipeline stage always yields a record. `Degraded` marks a record that
//! was substituted from static defaults and keeps the reason around.

use serde::{Deserialize, Serialize};

use crate::analysis::{ComplianceAnalysis, NarrativeAnalysis};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome<T> {
    Ok(T),
    Degraded { data: T, cause: String },
}

impl<T> Outcome<T> {
    pub fn degraded(data: T, cause: impl Into<String>) -> Self {
        Outcome::Degraded {
            data,
            cause: cause.into(),
        }
    }

    /// The record, whether genuine or substituted
    pub fn data(&self) -> &T {
        match self {
            Outcome::Ok(data) | Outcome::Degraded { data, .. } => data,
        }
    }

    pub fn into_data(self) -> T {
        match self {
            Outcome::Ok(data) | Outcome::Degraded { data, .. } => data,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    pub fn cause(&self) -> Option<&str> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Degraded { cause, .. } => Some(cause),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok(data) => Outcome::Ok(f(data)),
            Outcome::Degraded { data, cause } => Outcome::Degraded {
                data: f(data),
                cause,
            },
        }
    }
}

/// Output of one full analysis run. Both records always travel together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub analysis: Outcome<ComplianceAnalysis>,
    pub narrative: Outcome<NarrativeAnalysis>,
}

impl ReviewResult {
    /// True when either record came from the static fallbacks
    pub fn is_degraded(&self) -> bool {
        self.analysis.is_degraded() || self.narrative.is_degraded()
    }
}
