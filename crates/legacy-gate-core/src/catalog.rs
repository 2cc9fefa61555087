//! # Catalog Module
//!
//! Declaration surface and pre-execution filtering for gated tests.
//!
//! A host declares its tests into a [`TestCatalog`], each optionally tagged
//! with a [`VersionGate`]. Before running anything it calls
//! [`TestCatalog::plan`] once the target version is resolved, and gets back a
//! [`TestPlan`] listing which tests run and which are skipped (with reasons).
//!
//! Declarations live in a `BTreeMap` keyed by name, so plans come out in the
//! same order on every run.

use crate::decision::SkipDecision;
use crate::environment::TargetEnvironment;
use crate::error::GateError;
use crate::gate::VersionGate;
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// DECLARATIONS
// =============================================================================

/// Shape of a declared test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// A single test case.
    #[default]
    Fact,
    /// A parameterized family; every case shares the same gate.
    Theory,
}

/// One declared test and its optional gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDeclaration {
    name: String,
    kind: TestKind,
    cases: Vec<String>,
    gate: Option<VersionGate>,
}

impl TestDeclaration {
    /// The test name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fact or theory.
    #[must_use]
    pub fn kind(&self) -> TestKind {
        self.kind
    }

    /// Case labels of a theory. Empty for facts.
    #[must_use]
    pub fn cases(&self) -> &[String] {
        &self.cases
    }

    /// The gate, if this test is version-gated.
    #[must_use]
    pub fn gate(&self) -> Option<&VersionGate> {
        self.gate.as_ref()
    }

    /// Decide against an explicit target version. Ungated tests always run.
    #[must_use]
    pub fn decide(&self, current: Version) -> SkipDecision {
        self.gate
            .as_ref()
            .map(|gate| gate.decide(current))
            .unwrap_or(SkipDecision::Run)
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// All declared tests of a run, ordered by name.
#[derive(Debug, Clone, Default)]
pub struct TestCatalog {
    tests: BTreeMap<String, TestDeclaration>,
}

impl TestCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a single test that becomes legacy at `since`.
    pub fn declare_fact(
        &mut self,
        name: impl Into<String>,
        since: &str,
        message: impl Into<String>,
    ) -> Result<&TestDeclaration, GateError> {
        let gate = VersionGate::new(since, message)?;
        self.insert(name.into(), TestKind::Fact, Vec::new(), Some(gate))
    }

    /// Declare a parameterized test family that becomes legacy at `since`.
    pub fn declare_theory(
        &mut self,
        name: impl Into<String>,
        cases: Vec<String>,
        since: &str,
        message: impl Into<String>,
    ) -> Result<&TestDeclaration, GateError> {
        let gate = VersionGate::new(since, message)?;
        self.insert(name.into(), TestKind::Theory, cases, Some(gate))
    }

    /// Declare an ungated test.
    pub fn declare_plain(&mut self, name: impl Into<String>) -> Result<&TestDeclaration, GateError> {
        self.insert(name.into(), TestKind::Fact, Vec::new(), None)
    }

    fn insert(
        &mut self,
        name: String,
        kind: TestKind,
        cases: Vec<String>,
        gate: Option<VersionGate>,
    ) -> Result<&TestDeclaration, GateError> {
        if name.trim().is_empty() {
            return Err(GateError::invalid("test name", "must not be empty"));
        }
        if self.tests.contains_key(&name) {
            return Err(GateError::invalid(
                "test name",
                format!("'{}' is declared twice", name),
            ));
        }
        match kind {
            TestKind::Theory if cases.is_empty() => {
                return Err(GateError::invalid(
                    "theory cases",
                    format!("theory '{}' declares no cases", name),
                ));
            }
            TestKind::Fact if !cases.is_empty() => {
                return Err(GateError::invalid(
                    "fact cases",
                    format!("fact '{}' cannot declare cases", name),
                ));
            }
            _ => {}
        }

        let declaration = TestDeclaration {
            name: name.clone(),
            kind,
            cases,
            gate,
        };
        let stored = self.tests.entry(name).or_insert(declaration);
        Ok(&*stored)
    }

    /// Look up a declaration by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TestDeclaration> {
        self.tests.get(name)
    }

    /// Iterate declarations in name order.
    pub fn iter(&self) -> impl Iterator<Item = &TestDeclaration> {
        self.tests.values()
    }

    /// Number of declared tests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Check if nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Filter the catalog against the resolved target version.
    ///
    /// An unresolved environment aborts the whole plan with
    /// [`GateError::UnresolvedEnvironment`]; no test is planned on its own.
    pub fn plan(&self, env: &TargetEnvironment) -> Result<TestPlan, GateError> {
        let target = env.current()?;
        Ok(self.plan_for(target))
    }

    /// Filter the catalog against an explicit target version.
    #[must_use]
    pub fn plan_for(&self, target: Version) -> TestPlan {
        let entries = self
            .tests
            .values()
            .map(|test| {
                let decision = test.decide(target);
                if let SkipDecision::Skip(reason) = &decision {
                    tracing::debug!(
                        test = %test.name,
                        target_version = %target,
                        reason = %reason,
                        "skipping legacy test"
                    );
                }
                PlannedTest {
                    name: test.name.clone(),
                    kind: test.kind,
                    cases: test.cases.len(),
                    decision,
                }
            })
            .collect();

        TestPlan { target, entries }
    }

    /// Build a catalog from a manifest, validating every entry.
    ///
    /// Stops at the first invalid entry; the error names the test.
    pub fn from_manifest(manifest: &CatalogManifest) -> Result<Self, GateError> {
        let mut catalog = Self::new();
        for entry in &manifest.tests {
            catalog.declare_entry(entry).map_err(|err| match err {
                GateError::InvalidArgument { field, reason } => {
                    GateError::invalid(field, format!("{} (test '{}')", reason, entry.name))
                }
                other => other,
            })?;
        }
        Ok(catalog)
    }

    fn declare_entry(&mut self, entry: &ManifestEntry) -> Result<(), GateError> {
        let gate = match (&entry.deprecated_since, &entry.message) {
            (Some(since), message) => Some(VersionGate::new(
                since,
                message.clone().unwrap_or_default(),
            )?),
            (None, Some(_)) => {
                return Err(GateError::invalid(
                    "deprecated_since",
                    "a skip message needs a threshold version",
                ));
            }
            (None, None) => None,
        };
        self.insert(entry.name.clone(), entry.kind, entry.cases.clone(), gate)?;
        Ok(())
    }
}

// =============================================================================
// MANIFEST
// =============================================================================

/// JSON description of a catalog.
///
/// ```json
/// {"tests": [
///   {"name": "read_v1", "deprecated_since": "2.0.0", "message": "v1 removed"},
///   {"name": "append", "kind": "theory", "cases": ["a", "b"]}
/// ]}
/// ```
/// Unknown keys are rejected so a misspelled field cannot silently drop a
/// gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogManifest {
    /// Declared tests.
    #[serde(default)]
    pub tests: Vec<ManifestEntry>,
}

/// One test in a [`CatalogManifest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    /// Unique test name.
    pub name: String,
    /// Fact (default) or theory.
    #[serde(default)]
    pub kind: TestKind,
    /// Case labels for theories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cases: Vec<String>,
    /// Version at which the test becomes legacy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated_since: Option<String>,
    /// Skip message; required with `deprecated_since`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// =============================================================================
// PLAN
// =============================================================================

/// The filtered view of a catalog for one target version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPlan {
    /// The version the plan was computed for.
    pub target: Version,
    /// Every declared test, in name order.
    pub entries: Vec<PlannedTest>,
}

/// One test in a [`TestPlan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedTest {
    /// Test name.
    pub name: String,
    /// Fact or theory.
    pub kind: TestKind,
    /// Number of theory cases (0 for facts).
    pub cases: usize,
    /// Run or skip.
    pub decision: SkipDecision,
}

/// Counts for a [`TestPlan`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Declared tests.
    pub total: usize,
    /// Tests that run.
    pub run: usize,
    /// Tests skipped as legacy.
    pub skipped: usize,
}

impl TestPlan {
    /// Tests that run.
    pub fn runnable(&self) -> impl Iterator<Item = &PlannedTest> {
        self.entries.iter().filter(|e| !e.decision.is_skip())
    }

    /// Tests that are skipped.
    pub fn skipped(&self) -> impl Iterator<Item = &PlannedTest> {
        self.entries.iter().filter(|e| e.decision.is_skip())
    }

    /// Count run and skipped tests.
    #[must_use]
    pub fn summary(&self) -> PlanSummary {
        let skipped = self.skipped().count();
        PlanSummary {
            total: self.entries.len(),
            run: self.entries.len() - skipped,
            skipped,
        }
    }

    /// Format as plain text, one line per test plus a summary.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut output = format!("target version {}\n", self.target);

        for entry in &self.entries {
            let label = match entry.kind {
                TestKind::Fact => entry.name.clone(),
                TestKind::Theory => format!("{} [{} cases]", entry.name, entry.cases),
            };
            match &entry.decision {
                SkipDecision::Run => output.push_str(&format!("RUN  {}\n", label)),
                SkipDecision::Skip(reason) => {
                    output.push_str(&format!("SKIP {} ({})\n", label, reason));
                }
            }
        }

        let summary = self.summary();
        output.push_str(&format!(
            "{} tests: {} run, {} skipped\n",
            summary.total, summary.run, summary.skipped
        ));
        output
    }
}

// =============================================================================
// TESTS
// =============================================================================
