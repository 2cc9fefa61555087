//! # CLI Module
//!
//! Command-line interface for legacy-gate.
//!
//! Each `cmd_*` function returns the text destined for stdout so the binary
//! and the integration tests share one code path. Logs go to stderr.

use clap::{Parser, Subcommand, ValueEnum};
use legacy_gate_core::{
    CatalogManifest, GateError, SkipDecision, TARGET_VERSION_ENV, TargetEnvironment, TestCatalog,
    Version, VersionGate,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

// =============================================================================
// CLI DEFINITION
// =============================================================================

/// legacy-gate - retire tests once the target version outgrows them.
#[derive(Parser, Debug)]
#[command(name = "legacy-gate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decide a single gate against the target version
    Check {
        /// Version at which the test becomes legacy
        #[arg(long)]
        since: String,

        /// Skip message reported when the test is skipped
        #[arg(long)]
        message: String,

        /// Version of the system under test
        #[arg(long, env = TARGET_VERSION_ENV)]
        target_version: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Filter a manifest of gated tests for the target version
    Plan {
        /// Path to the JSON manifest
        #[arg(short, long)]
        manifest: PathBuf,

        /// Version of the system under test
        #[arg(long, env = TARGET_VERSION_ENV)]
        target_version: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Validate a manifest without a target version
    Validate {
        /// Path to the JSON manifest
        #[arg(short, long)]
        manifest: PathBuf,
    },
}

/// Output format for `check` and `plan`.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// JSON output of `check`.
#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    threshold: Version,
    target: Version,
    decision: &'a SkipDecision,
}

// =============================================================================
// HELPERS
// =============================================================================

/// Resolve the target version of `env`.
///
/// An explicit value wins; without one the `LEGACY_GATE_TARGET_VERSION`
/// variable is read. An explicit value that differs from an already
/// established one is a [`GateError::VersionConflict`]. Failure is fatal for
/// the run.
pub fn resolve_target(
    env: &TargetEnvironment,
    target_version: Option<&str>,
) -> Result<Version, GateError> {
    match target_version {
        Some(raw) => {
            let version = Version::parse(raw).map_err(|err| GateError::VersionDetection {
                source_name: "--target-version".to_string(),
                reason: err.to_string(),
            })?;
            env.establish(version)
        }
        None => env.resolve_from_env_var(TARGET_VERSION_ENV),
    }
}

/// Load a manifest from disk.
pub fn load_manifest(path: &Path) -> Result<CatalogManifest, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read manifest {}: {}", path.display(), e))?;
    let manifest: CatalogManifest = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse manifest {}: {}", path.display(), e))?;
    Ok(manifest)
}

// =============================================================================
// COMMANDS
// =============================================================================

/// Decide one gate.
pub fn cmd_check(
    env: &TargetEnvironment,
    since: &str,
    message: &str,
    target_version: Option<&str>,
    format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let gate = VersionGate::new(since, message)?;
    let target = resolve_target(env, target_version)?;
    let decision = gate.resolve_skip_reason(env)?;

    tracing::debug!(
        threshold = %gate.threshold(),
        target_version = %target,
        skip = decision.is_skip(),
        "gate checked"
    );

    match format {
        OutputFormat::Text => Ok(match &decision {
            SkipDecision::Run => "run\n".to_string(),
            SkipDecision::Skip(reason) => format!("skip: {}\n", reason),
        }),
        OutputFormat::Json => {
            let report = CheckReport {
                threshold: gate.threshold(),
                target,
                decision: &decision,
            };
            Ok(format!("{}\n", serde_json::to_string_pretty(&report)?))
        }
    }
}

/// Plan every test of a manifest.
pub fn cmd_plan(
    env: &TargetEnvironment,
    manifest_path: &Path,
    target_version: Option<&str>,
    format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let manifest = load_manifest(manifest_path)?;
    let catalog = TestCatalog::from_manifest(&manifest)?;
    resolve_target(env, target_version)?;
    let plan = catalog.plan(env)?;

    let summary = plan.summary();
    tracing::info!(
        target_version = %plan.target,
        total = summary.total,
        run = summary.run,
        skipped = summary.skipped,
        "plan computed"
    );

    match format {
        OutputFormat::Text => Ok(plan.to_text()),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&plan)?)),
    }
}

/// Validate a manifest.
pub fn cmd_validate(manifest_path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let manifest = load_manifest(manifest_path)?;
    let catalog = TestCatalog::from_manifest(&manifest)?;
    let gated = catalog.iter().filter(|t| t.gate().is_some()).count();

    tracing::info!(declarations = catalog.len(), gated, "manifest valid");

    Ok(format!("{} declarations ({} gated)\n", catalog.len(), gated))
}

/// Dispatch a parsed command against `env`.
pub fn run(cli: Cli, env: &TargetEnvironment) -> Result<String, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Check {
            since,
            message,
            target_version,
            format,
        } => cmd_check(env, &since, &message, target_version.as_deref(), format),
        Commands::Plan {
            manifest,
            target_version,
            format,
        } => cmd_plan(env, &manifest, target_version.as_deref(), format),
        Commands::Validate { manifest } => cmd_validate(&manifest),
    }
}
