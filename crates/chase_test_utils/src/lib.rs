//! # Chase Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Small hand-made playfields that force specific situations
//! - Determinism harness over seeded games
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
