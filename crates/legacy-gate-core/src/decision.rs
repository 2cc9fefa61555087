//! # Decision Module
//!
//! The two terminal outcomes of a gate query.

use serde::{Deserialize, Serialize};

/// Outcome of asking a gate whether its test should run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum SkipDecision {
    /// The test runs normally.
    Run,
    /// The test is skipped; the message goes into the test report.
    Skip(String),
}

impl SkipDecision {
    /// Check if this decision suppresses the test.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip(_))
    }

    /// The skip reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Run => None,
            Self::Skip(reason) => Some(reason),
        }
    }

    /// Consume the decision, keeping only the skip reason.
    #[must_use]
    pub fn into_reason(self) -> Option<String> {
        match self {
            Self::Run => None,
            Self::Skip(reason) => Some(reason),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
