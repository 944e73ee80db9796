//! Shared test utilities for scanscribe integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated pipeline runs against scripted fakes
//! - Builders for scripted documents and real PDFs with a text layer

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
