//! Shared test utilities for printlog integration tests.
//!
//! This module provides:
//! - `TestHarness` with a temp spool directory, page log and file-backed store
//! - Builders for control files and configurations

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
