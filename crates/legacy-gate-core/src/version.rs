//! # Version Module
//!
//! The ordered version value compared by every gate.
//!
//! A `Version` is a plain `(major, minor, patch, revision)` tuple of integers.
//! Ordering is lexicographic on that tuple, which makes it a total order: for
//! any two versions exactly one of `<`, `==`, `>` holds. The revision is zero
//! unless the text carries a fourth component.
//!
//! ## Accepted text forms
//!
//! - `2`, `2.1`, `2.1.3` (missing components are zero)
//! - `v2.1.3` (leading `v` or `V`)
//! - `20.10.1.5` (four-part build numbers; the revision takes part in ordering)
//! - `24.2.0-rc.1`, `23.10.0+build.7` (pre-release and build suffixes are
//!   dropped, so a release candidate compares equal to its release)

use crate::error::GateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Most dotted components accepted by [`Version::parse`].
const MAX_COMPONENTS: usize = 4;

/// A version number (major, minor, patch, revision).
///
/// Field order is the comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    revision: u64,
}

impl Version {
    /// Create a version from its components, with revision 0.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            revision: 0,
        }
    }

    /// Set the fourth (revision) component.
    #[must_use]
    pub const fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    /// Parse a version string.
    ///
    /// Fails with [`GateError::InvalidArgument`] on empty input, non-numeric
    /// components, too many components, or components that overflow `u64`.
    pub fn parse(input: &str) -> Result<Self, GateError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(GateError::invalid("version", "version string is empty"));
        }

        let unprefixed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        // Pre-release and build metadata never take part in ordering
        let core = unprefixed
            .split(['-', '+'])
            .next()
            .unwrap_or(unprefixed);
        if core.is_empty() {
            return Err(GateError::invalid(
                "version",
                format!("'{}' has no numeric components", trimmed),
            ));
        }

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > MAX_COMPONENTS {
            return Err(GateError::invalid(
                "version",
                format!(
                    "'{}' has {} components, at most {} are allowed",
                    trimmed,
                    parts.len(),
                    MAX_COMPONENTS
                ),
            ));
        }

        let mut numbers = [0u64; MAX_COMPONENTS];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = parse_component(trimmed, part)?;
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]).with_revision(numbers[3]))
    }

    /// Returns the major version component.
    #[must_use]
    pub const fn major(&self) -> u64 {
        self.major
    }

    /// Returns the minor version component.
    #[must_use]
    pub const fn minor(&self) -> u64 {
        self.minor
    }

    /// Returns the patch version component.
    #[must_use]
    pub const fn patch(&self) -> u64 {
        self.patch
    }

    /// Returns the revision component (0 for three-part versions).
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the version as a tuple `(major, minor, patch, revision)`.
    #[must_use]
    pub const fn as_tuple(&self) -> (u64, u64, u64, u64) {
        (self.major, self.minor, self.patch, self.revision)
    }
}

fn parse_component(input: &str, part: &str) -> Result<u64, GateError> {
    if part.is_empty() {
        return Err(GateError::invalid(
            "version",
            format!("'{}' contains an empty component", input),
        ));
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GateError::invalid(
            "version",
            format!("'{}' has non-numeric component '{}'", input, part),
        ));
    }
    part.parse::<u64>().map_err(|_| {
        GateError::invalid(
            "version",
            format!("component '{}' of '{}' is out of range", part, input),
        )
    })
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.revision != 0 {
            write!(f, ".{}", self.revision)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = GateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.to_string()
    }
}

/// The revision has no semver slot; it travels as build metadata, which
/// semver ignores when ordering.
impl From<Version> for semver::Version {
    fn from(v: Version) -> Self {
        let mut sv = semver::Version::new(v.major, v.minor, v.patch);
        if v.revision != 0 {
            sv.build = semver::BuildMetadata::new(&v.revision.to_string())
                .unwrap_or(semver::BuildMetadata::EMPTY);
        }
        sv
    }
}

impl From<&semver::Version> for Version {
    fn from(v: &semver::Version) -> Self {
        Version::new(v.major, v.minor, v.patch)
    }
}

impl From<semver::Version> for Version {
    fn from(v: semver::Version) -> Self {
        Version::from(&v)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_version() {
        let v = Version::parse("2.1.3").unwrap();
        assert_eq!(v.as_tuple(), (2, 1, 3, 0));
    }

    #[test]
    fn parse_pads_missing_components() {
        assert_eq!(Version::parse("2").unwrap(), Version::new(2, 0, 0));
        assert_eq!(Version::parse("2.1").unwrap(), Version::new(2, 1, 0));
    }

    #[test]
    fn parse_accepts_prefix_and_whitespace() {
        assert_eq!(Version::parse("  v21.10.4 ").unwrap(), Version::new(21, 10, 4));
        assert_eq!(Version::parse("V1.0.0").unwrap(), Version::new(1, 0, 0));
    }

    #[test]
    fn parse_keeps_revision_component() {
        let v = Version::parse("20.10.1.7").unwrap();
        assert_eq!(v, Version::new(20, 10, 1).with_revision(7));
        assert_eq!(v.revision(), 7);
        assert_eq!(Version::parse("20.10.1.0").unwrap(), Version::new(20, 10, 1));
    }

    #[test]
    fn revision_takes_part_in_ordering() {
        let lower = Version::parse("20.10.1.2").unwrap();
        let higher = Version::parse("20.10.1.5").unwrap();
        assert!(lower < higher);
        assert!(Version::new(20, 10, 1) < lower);
        assert!(higher < Version::new(20, 10, 2));
    }

    #[test]
    fn parse_drops_prerelease_and_build() {
        assert_eq!(Version::parse("24.2.0-rc.1").unwrap(), Version::new(24, 2, 0));
        assert_eq!(Version::parse("23.10.0+build.7").unwrap(), Version::new(23, 10, 0));
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for bad in ["", "   ", "v", "-rc.1", "1..2", "1.2.", "a.b.c", "1.2.3.4.5", "1.x"] {
            let err = Version::parse(bad).unwrap_err();
            assert!(
                matches!(err, GateError::InvalidArgument { field: "version", .. }),
                "expected InvalidArgument for {:?}, got {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn parse_rejects_overflow() {
        let err = Version::parse("99999999999999999999999.0.0").unwrap_err();
        assert!(matches!(err, GateError::InvalidArgument { .. }));
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(Version::new(1, 9, 9) < Version::new(2, 0, 0));
        assert!(Version::new(2, 1, 0) > Version::new(2, 0, 9));
        assert!(Version::new(2, 0, 1) > Version::new(2, 0, 0));
        assert_eq!(Version::new(2, 0, 0), Version::parse("2").unwrap());
    }

    #[test]
    fn display_is_dotted_triple() {
        assert_eq!(Version::new(22, 10, 0).to_string(), "22.10.0");
        assert_eq!(Version::new(22, 10, 0).with_revision(3).to_string(), "22.10.0.3");
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&Version::new(2, 1, 0)).unwrap();
        assert_eq!(json, "\"2.1.0\"");
        let back: Version = serde_json::from_str("\"v2.1\"").unwrap();
        assert_eq!(back, Version::new(2, 1, 0));
        assert!(serde_json::from_str::<Version>("\"two\"").is_err());
    }

    #[test]
    fn semver_conversion() {
        let sv = semver::Version::parse("3.4.5-beta.2").unwrap();
        assert_eq!(Version::from(&sv), Version::new(3, 4, 5));
        let back: semver::Version = Version::new(3, 4, 5).into();
        assert_eq!(back, semver::Version::new(3, 4, 5));

        let with_revision: semver::Version = Version::new(3, 4, 5).with_revision(9).into();
        assert_eq!(with_revision.to_string(), "3.4.5+9");
    }
}
