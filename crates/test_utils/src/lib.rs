//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims escalation test suite.
//!
//! # Modules
//!
//! - `fixtures`: Fixed timestamps, identifiers and names
//! - `builders`: Builders for claims and a fully wired in-memory harness
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
