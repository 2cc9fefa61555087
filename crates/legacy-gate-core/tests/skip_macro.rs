//! Tests for `skip_if_legacy!` against the process-wide environment.
//!
//! This file runs as its own process, so it owns `environment::global()`.
//! Every test resolves it to the same version; only the first call wins.

#![allow(clippy::unwrap_used, clippy::panic)]

use legacy_gate_core::environment::global;
use legacy_gate_core::{GateError, TargetEnvironment, Version, skip_if_legacy};

const TARGET: Version = Version::new(2, 0, 0);

fn resolve_global() {
    global().resolve_with(|| Ok(TARGET)).unwrap();
}

#[derive(Debug, PartialEq)]
enum HarnessError {
    Gate(GateError),
}

impl From<GateError> for HarnessError {
    fn from(err: GateError) -> Self {
        Self::Gate(err)
    }
}

fn gated_body(since: &str, ran: &mut bool) -> Result<(), GateError> {
    skip_if_legacy!(since, "legacy behaviour");
    *ran = true;
    Ok(())
}

#[test]
fn skips_at_threshold() -> Result<(), GateError> {
    resolve_global();
    let mut ran = false;
    gated_body("2.0.0", &mut ran)?;
    assert!(!ran);
    Ok(())
}

#[test]
fn runs_below_threshold() -> Result<(), GateError> {
    resolve_global();
    let mut ran = false;
    gated_body("2.0.1", &mut ran)?;
    assert!(ran);
    Ok(())
}

#[test]
fn construction_errors_propagate() {
    resolve_global();
    let mut ran = false;
    let err = gated_body("not-a-version", &mut ran).unwrap_err();
    assert!(matches!(err, GateError::InvalidArgument { .. }));
    assert!(!ran);
}

#[test]
fn explicit_environment_and_error_conversion() {
    fn body(env: &TargetEnvironment) -> Result<(), HarnessError> {
        skip_if_legacy!(env = env, "5.0.0", "removed in 5.0");
        Ok(())
    }

    let unresolved = TargetEnvironment::new();
    assert_eq!(
        body(&unresolved),
        Err(HarnessError::Gate(GateError::UnresolvedEnvironment))
    );

    let resolved = TargetEnvironment::resolved(Version::new(5, 0, 0));
    assert_eq!(body(&resolved), Ok(()));
}

#[test]
fn global_cannot_be_moved() {
    resolve_global();
    let err = global().establish(Version::new(9, 0, 0)).unwrap_err();
    assert!(matches!(err, GateError::VersionConflict { .. }));
    assert_eq!(global().current().unwrap(), TARGET);
}
