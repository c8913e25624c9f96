//! # Concord
//!
//! Cross-variant correctness harness: several independently built
//! programs are supposed to compute the same result via different
//! execution strategies (single-threaded, multi-threaded, distributed).
//! Concord builds each one, feeds every variant the same staged input,
//! and fails the run the moment any two runs disagree on the output.
//! Concurrent and distributed variants are exercised at several
//! concurrency degrees, and each case is repeated to flush out
//! intermittent races.

#![warn(clippy::all)]

pub mod build;
pub mod cases;
pub mod catalog;
pub mod checker;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod runner;

pub use build::{Builder, ToolchainBuilder};
pub use cases::{CaseFilter, TestCase, discover_cases, select};
pub use catalog::{ExecKind, PrecisionMode, Variant, VariantCatalog};
pub use checker::{CheckState, ConsistencyChecker};
pub use config::{BuildConfig, HarnessConfig};
pub use error::HarnessError;
pub use orchestrator::Orchestrator;
pub use report::{CaseOutcome, RunReport, Verdict};
pub use runner::{Invocation, RunResult, Runner};
