//! Common test utilities for Trellis scenario and CLI tests.
//!
//! This module provides:
//! - `ResolverTree`: isolated temp project with a `resolvers/` root
//! - `TestResult`: captured output of a `trellis` CLI run
//! - Fixtures: reusable handler sources

#![allow(dead_code)]

pub mod fixtures;

pub use env::*;
pub use fixtures::*;
