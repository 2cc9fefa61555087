//! # Error Module
//!
//! Every failure the gate machinery can report.
//!
//! Declaration-time errors (`InvalidArgument`) stop a single test from being
//! registered. Environment errors (`UnresolvedEnvironment`,
//! `VersionDetection`, `VersionConflict`) are fatal for the whole run.

use thiserror::Error;

/// Errors raised while declaring, resolving, or querying version gates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// A declaration input was malformed.
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        /// Which input was rejected (e.g. "threshold version").
        field: &'static str,
        /// Human-readable description of the problem.
        reason: String,
    },

    /// A gate was queried before the target version was established.
    #[error("target version has not been resolved; resolve it once before querying any gate")]
    UnresolvedEnvironment,

    /// Something tried to overwrite a derived skip decision.
    #[error("the skip reason of a version gate is derived and cannot be set")]
    UnsupportedMutation,

    /// The target version could not be detected.
    #[error("failed to detect target version from {source_name}: {reason}")]
    VersionDetection {
        /// Where detection looked (env var name, detector name, ...).
        source_name: String,
        /// Why detection failed.
        reason: String,
    },

    /// The target version was already established with another value.
    #[error("target version already resolved as {established}, refusing {attempted}")]
    VersionConflict {
        /// The value that won.
        established: String,
        /// The value that was refused.
        attempted: String,
    },
}

impl GateError {
    /// Build an [`GateError::InvalidArgument`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// True for errors that must abort the whole test run.
    #[must_use]
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedEnvironment | Self::VersionDetection { .. } | Self::VersionConflict { .. }
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
