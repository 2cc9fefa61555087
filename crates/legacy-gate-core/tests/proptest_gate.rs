//! Property-based tests for gate decisions.
//!
//! The decision must follow the version total order exactly, and repeated
//! or concurrent queries must agree.

#![allow(clippy::unwrap_used, clippy::panic)]

use legacy_gate_core::{GateError, SkipDecision, TargetEnvironment, TestMarker, Version, VersionGate};
use proptest::prelude::*;
use std::sync::Arc;

fn version_strategy() -> impl Strategy<Value = Version> {
    // Small ranges make equal and adjacent versions common
    (0u64..5, 0u64..5, 0u64..5, 0u64..3).prop_map(|(major, minor, patch, revision)| {
        Version::new(major, minor, patch).with_revision(revision)
    })
}

fn wide_version_strategy() -> impl Strategy<Value = Version> {
    (any::<u64>(), any::<u64>(), any::<u64>(), any::<u64>()).prop_map(
        |(major, minor, patch, revision)| Version::new(major, minor, patch).with_revision(revision),
    )
}

proptest! {
    #[test]
    fn skip_iff_target_reaches_threshold(threshold in version_strategy(), current in version_strategy()) {
        let gate = VersionGate::from_version(threshold, "legacy").unwrap();
        let decision = gate.decide(current);
        if current >= threshold {
            prop_assert_eq!(decision, SkipDecision::Skip("legacy".to_string()));
        } else {
            prop_assert_eq!(decision, SkipDecision::Run);
        }
    }

    #[test]
    fn decision_follows_wide_ordering(threshold in wide_version_strategy(), current in wide_version_strategy()) {
        let gate = VersionGate::from_version(threshold, "legacy").unwrap();
        prop_assert_eq!(gate.decide(current).is_skip(), current >= threshold);
    }

    #[test]
    fn queries_are_idempotent(threshold in version_strategy(), current in version_strategy()) {
        let gate = VersionGate::from_version(threshold, "removed").unwrap();
        let env = TargetEnvironment::resolved(current);
        let first = gate.resolve_skip_reason(&env).unwrap();
        for _ in 0..4 {
            prop_assert_eq!(&gate.resolve_skip_reason(&env).unwrap(), &first);
        }
    }

    #[test]
    fn display_parse_agree(v in wide_version_strategy()) {
        prop_assert_eq!(Version::parse(&v.to_string()).unwrap(), v);
    }

    #[test]
    fn non_numeric_thresholds_are_rejected(word in "[a-zA-Z_]{1,12}") {
        // A lone "v"/"V" prefix leaves nothing numeric behind either
        let result = VersionGate::new(&word, "legacy");
        let is_invalid = matches!(result, Err(GateError::InvalidArgument { .. }));
        prop_assert!(is_invalid);
    }

    #[test]
    fn mutation_always_rejected(threshold in version_strategy(), reason in proptest::option::of(".*")) {
        let mut gate = VersionGate::from_version(threshold, "legacy").unwrap();
        prop_assert_eq!(gate.set_skip_reason(reason), Err(GateError::UnsupportedMutation));
    }
}

#[test]
fn parallel_queries_agree() {
    let env = Arc::new(TargetEnvironment::resolved(Version::new(2, 0, 0)));
    let gate = Arc::new(VersionGate::new("2.0.0", "legacy").unwrap());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let env = Arc::clone(&env);
            let gate = Arc::clone(&gate);
            std::thread::spawn(move || gate.resolve_skip_reason(&env).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), SkipDecision::Skip("legacy".to_string()));
    }
}

#[test]
fn scenarios() {
    let gate = VersionGate::new("2.0.0", "message").unwrap();
    let skip = SkipDecision::Skip("message".to_string());

    // A: equal versions skip
    assert_eq!(gate.decide(Version::new(2, 0, 0)), skip);
    // B: older target runs
    assert_eq!(gate.decide(Version::new(1, 9, 9)), SkipDecision::Run);
    // C: newer target skips
    assert_eq!(gate.decide(Version::new(2, 1, 0)), skip);
    // D: empty threshold
    assert!(matches!(
        VersionGate::new("", "message"),
        Err(GateError::InvalidArgument { .. })
    ));
    // E: unresolved environment
    assert_eq!(
        gate.resolve_skip_reason(&TargetEnvironment::new()),
        Err(GateError::UnresolvedEnvironment)
    );
}
