//! # legacy-gate Library
//!
//! This library exposes the CLI module for testing and integration.
//!
//! The binary uses it through the `main.rs` entry point.

pub mod cli;

// Re-export the core for convenience
pub use legacy_gate_core;
