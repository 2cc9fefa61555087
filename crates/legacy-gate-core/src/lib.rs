//! # Legacy Gate Core
//!
//! Retires tests once the system under test outgrows them.
//!
//! A test tagged with a [`VersionGate`] ("legacy since 2.0.0, because ...")
//! runs while the target version is older than the threshold and is skipped,
//! with its message, from the threshold onward.
//!
//! ## Pieces
//!
//! - [`Version`]: ordered `(major, minor, patch)` value.
//! - [`VersionGate`]: threshold plus message; answers run or skip.
//! - [`TargetEnvironment`]: write-once holder of the target version.
//! - [`TestCatalog`]: declaration surface and pre-execution filtering.
//! - [`skip_if_legacy!`]: early return inside a `#[test]` body.
//!
//! ## Example
//!
//! ```
//! use legacy_gate_core::{SkipDecision, TargetEnvironment, Version, VersionGate};
//!
//! let env = TargetEnvironment::resolved(Version::new(2, 1, 0));
//! let gate = VersionGate::new("2.0.0", "v1 subscriptions were removed").unwrap();
//!
//! assert_eq!(
//!     gate.resolve_skip_reason(&env).unwrap(),
//!     SkipDecision::Skip("v1 subscriptions were removed".to_string())
//! );
//! ```

pub mod catalog;
pub mod decision;
pub mod environment;
pub mod error;
pub mod gate;
pub mod version;

pub use catalog::{
    CatalogManifest, ManifestEntry, PlanSummary, PlannedTest, TestCatalog, TestDeclaration,
    TestKind, TestPlan,
};
pub use decision::SkipDecision;
pub use environment::{TARGET_VERSION_ENV, TargetEnvironment};
pub use error::GateError;
pub use gate::{StaticMarker, TestMarker, VersionGate};
pub use version::Version;

/// Log a skip issued by [`skip_if_legacy!`].
#[doc(hidden)]
pub fn report_skip(location: &str, reason: &str) {
    tracing::info!(test = location, reason = reason, "skipped legacy test");
}

/// Return early from a test once the target version makes it legacy.
///
/// The enclosing function must return `Result<(), E>` with
/// `E: From<GateError>`. Construction and environment errors propagate.
///
/// ```
/// use legacy_gate_core::{skip_if_legacy, GateError, TargetEnvironment, Version};
///
/// fn reads_v1_stream(env: &TargetEnvironment) -> Result<(), GateError> {
///     skip_if_legacy!(env = env, "2.0.0", "v1 reads were removed");
///     unreachable!("target 2.0.0 is not older than the threshold");
/// }
///
/// let env = TargetEnvironment::resolved(Version::new(2, 0, 0));
/// assert!(reads_v1_stream(&env).is_ok());
/// ```
///
/// Without `env = ...` the process-wide [`environment::global`] is used.
#[macro_export]
macro_rules! skip_if_legacy {
    (env = $env:expr, $since:expr, $message:expr $(,)?) => {
        match $crate::VersionGate::new($since, $message)
            .and_then(|gate| gate.resolve_skip_reason($env))
        {
            ::core::result::Result::Ok($crate::SkipDecision::Skip(reason)) => {
                $crate::report_skip(::core::module_path!(), &reason);
                return ::core::result::Result::Ok(());
            }
            ::core::result::Result::Ok($crate::SkipDecision::Run) => {}
            ::core::result::Result::Err(err) => {
                return ::core::result::Result::Err(::core::convert::From::from(err));
            }
        }
    };
    ($since:expr, $message:expr $(,)?) => {
        $crate::skip_if_legacy!(env = $crate::environment::global(), $since, $message)
    };
}
