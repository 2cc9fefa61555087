//! # Environment Module
//!
//! Holds the CurrentTargetVersion: the version of the system under test.
//!
//! The value is written once, before the first gate query, and never changes
//! afterward. Reads go straight to a `OnceLock` and take no locks, so gates
//! can be queried from any number of threads during parallel discovery.
//!
//! ## Resolution
//!
//! ```text
//! host startup ── resolve_with(detector) ──► OnceLock<Version> ◄── gate queries
//!                 (serialized, first win)         (lock-free reads)
//! ```
//!
//! A detector failure is fatal for the run: the error is returned to the
//! caller and the environment stays unresolved, so every later query fails
//! with `UnresolvedEnvironment` instead of silently running legacy tests.

use crate::error::GateError;
use crate::version::Version;
use std::sync::{Mutex, OnceLock, PoisonError};

/// Environment variable read by [`TargetEnvironment::resolve_from_env_var`]
/// callers that do not pick their own name.
pub const TARGET_VERSION_ENV: &str = "LEGACY_GATE_TARGET_VERSION";

static GLOBAL: TargetEnvironment = TargetEnvironment::new();

/// The process-wide target environment.
///
/// Used by `skip_if_legacy!` and by hosts that do not inject their own.
#[must_use]
pub fn global() -> &'static TargetEnvironment {
    &GLOBAL
}

/// Write-once holder of the target version.
#[derive(Debug, Default)]
pub struct TargetEnvironment {
    /// The resolved version, once established.
    version: OnceLock<Version>,
    /// Serializes detectors so only one runs while unresolved.
    resolving: Mutex<()>,
}

impl TargetEnvironment {
    /// Create an unresolved environment.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            version: OnceLock::new(),
            resolving: Mutex::new(()),
        }
    }

    /// Create an environment that is already resolved.
    #[must_use]
    pub fn resolved(version: Version) -> Self {
        let env = Self::new();
        let _ = env.version.set(version);
        env
    }

    /// The established target version.
    ///
    /// Fails with [`GateError::UnresolvedEnvironment`] before resolution.
    pub fn current(&self) -> Result<Version, GateError> {
        self.version
            .get()
            .copied()
            .ok_or(GateError::UnresolvedEnvironment)
    }

    /// Whether a version has been established.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.version.get().is_some()
    }

    /// Establish the target version.
    ///
    /// The first write wins. Repeating the same value succeeds; a different
    /// value fails with [`GateError::VersionConflict`].
    pub fn establish(&self, version: Version) -> Result<Version, GateError> {
        match self.version.set(version) {
            Ok(()) => Ok(version),
            Err(attempted) => {
                let established = self.current()?;
                if established == attempted {
                    Ok(established)
                } else {
                    Err(GateError::VersionConflict {
                        established: established.to_string(),
                        attempted: attempted.to_string(),
                    })
                }
            }
        }
    }

    /// Resolve the target version with `detect` unless already resolved.
    ///
    /// Concurrent callers serialize; once a detector succeeds no other
    /// detector runs. A detector error is returned as-is and leaves the
    /// environment unresolved.
    pub fn resolve_with<F>(&self, detect: F) -> Result<Version, GateError>
    where
        F: FnOnce() -> Result<Version, GateError>,
    {
        if let Some(version) = self.version.get() {
            return Ok(*version);
        }

        let _guard = self
            .resolving
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(version) = self.version.get() {
            return Ok(*version);
        }

        let version = detect()?;
        self.establish(version)
    }

    /// Resolve from a process environment variable.
    pub fn resolve_from_env_var(&self, name: &str) -> Result<Version, GateError> {
        self.resolve_with(|| detect_from_env_var(name))
    }
}

/// Read and parse a version from the process environment variable `name`.
pub fn detect_from_env_var(name: &str) -> Result<Version, GateError> {
    detect_with_lookup(name, |key| std::env::var(key).ok())
}

/// Read and parse a version through `lookup`.
///
/// `lookup` maps a variable name to its value; this is the seam tests use
/// instead of mutating the real process environment.
pub fn detect_with_lookup<L>(name: &str, lookup: L) -> Result<Version, GateError>
where
    L: FnOnce(&str) -> Option<String>,
{
    let raw = lookup(name).ok_or_else(|| GateError::VersionDetection {
        source_name: name.to_string(),
        reason: "variable is not set".to_string(),
    })?;

    Version::parse(&raw).map_err(|err| GateError::VersionDetection {
        source_name: name.to_string(),
        reason: err.to_string(),
    })
}

// =============================================================================
// TESTS
// =============================================================================
