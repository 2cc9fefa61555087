//! # Gate Module
//!
//! `VersionGate` decides whether a test has become legacy.
//!
//! A gate is built from two immutable inputs, a threshold version and a skip
//! message, and answers one question: given the current target version,
//! should its test run? Once the target reaches the threshold, the test is
//! skipped with the message.
//!
//! ## Markers
//!
//! Hosts treat every test marker uniformly through [`TestMarker`]. Ordinary
//! markers ([`StaticMarker`]) carry a settable skip reason. A gate's reason
//! is derived, so setting it through the marker seam always fails with
//! [`GateError::UnsupportedMutation`]; the gate type itself has no setter.

use crate::decision::SkipDecision;
use crate::environment::TargetEnvironment;
use crate::error::GateError;
use crate::version::Version;

// =============================================================================
// TESTMARKER TRAIT
// =============================================================================

/// The seam a host framework uses to read and write test skip reasons.
pub trait TestMarker {
    /// The reason this test is skipped, or `None` if it runs.
    fn skip_reason(&self, env: &TargetEnvironment) -> Result<Option<String>, GateError>;

    /// Overwrite the skip reason.
    fn set_skip_reason(&mut self, reason: Option<String>) -> Result<(), GateError>;
}

// =============================================================================
// VERSION GATE
// =============================================================================

/// Skips a test once the target version reaches `threshold`.
///
/// Both fields are fixed at construction; nothing can change them later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionGate {
    /// The version at which the tested behaviour became legacy.
    threshold: Version,
    /// Reported when the test is skipped. Never empty.
    message: String,
}

impl VersionGate {
    /// Create a gate from a threshold version string.
    ///
    /// Fails with [`GateError::InvalidArgument`] if the threshold is
    /// malformed or the message is blank.
    pub fn new(threshold: &str, message: impl Into<String>) -> Result<Self, GateError> {
        let threshold = Version::parse(threshold).map_err(|err| match err {
            GateError::InvalidArgument { reason, .. } => {
                GateError::invalid("threshold version", reason)
            }
            other => other,
        })?;
        Self::from_version(threshold, message)
    }

    /// Create a gate from an already-parsed threshold.
    pub fn from_version(threshold: Version, message: impl Into<String>) -> Result<Self, GateError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(GateError::invalid("skip message", "must not be empty"));
        }
        Ok(Self { threshold, message })
    }

    /// The version at which the test becomes legacy.
    #[must_use]
    pub fn threshold(&self) -> Version {
        self.threshold
    }

    /// The skip message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Decide against an explicit target version.
    ///
    /// `current >= threshold` skips; anything older runs.
    #[must_use]
    pub fn decide(&self, current: Version) -> SkipDecision {
        if current >= self.threshold {
            SkipDecision::Skip(self.message.clone())
        } else {
            SkipDecision::Run
        }
    }

    /// Decide against the target version held by `env`.
    ///
    /// Fails with [`GateError::UnresolvedEnvironment`] if `env` has not been
    /// resolved yet.
    pub fn resolve_skip_reason(&self, env: &TargetEnvironment) -> Result<SkipDecision, GateError> {
        let current = env.current()?;
        Ok(self.decide(current))
    }
}

impl TestMarker for VersionGate {
    fn skip_reason(&self, env: &TargetEnvironment) -> Result<Option<String>, GateError> {
        self.resolve_skip_reason(env).map(SkipDecision::into_reason)
    }

    fn set_skip_reason(&mut self, _reason: Option<String>) -> Result<(), GateError> {
        Err(GateError::UnsupportedMutation)
    }
}

// =============================================================================
// STATIC MARKER
// =============================================================================

/// An ordinary marker whose skip reason is set directly.
///
/// Does not consult the environment at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticMarker {
    reason: Option<String>,
}

impl StaticMarker {
    /// A marker for a test that runs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A marker for a test that is always skipped.
    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }
}

impl TestMarker for StaticMarker {
    fn skip_reason(&self, _env: &TargetEnvironment) -> Result<Option<String>, GateError> {
        Ok(self.reason.clone())
    }

    fn set_skip_reason(&mut self, reason: Option<String>) -> Result<(), GateError> {
        self.reason = reason;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
