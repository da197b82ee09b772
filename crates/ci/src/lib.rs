//! Linter execution and check run reporting for lintcheck.
//!
//! [`runner`] starts the linter and captures what it prints; [`report`]
//! publishes that output as a check run through a [`report::CheckRunApi`]
//! implementation supplied by a provider crate.

pub mod report;
pub mod runner;

pub use report::{CheckRunApi, CheckRunReporter, ReporterConfig, RunOutcome};
pub use runner::{CommandLinter, Linter, ToolOutput};
