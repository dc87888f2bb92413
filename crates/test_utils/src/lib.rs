//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! PAYE calculator test suite.
//!
//! # Modules
//!
//! - `fixtures`: Worked PAYE scenarios with known results
//! - `assertions`: Custom assertion helpers for calculation results
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use assertions::*;
pub use generators::*;
