//! Core types and utilities for lintcheck
//!
//! This crate holds everything the other lintcheck crates share:
//! - [`Error`] and [`Result`], the single error type of the workspace
//! - [`command`]: splitting a linter command string into argv
//! - [`findings`]: the linter's JSON report and how it is decoded
//! - [`config`]: the action configuration built once at process entry

pub mod command;
pub mod config;
pub mod error;
pub mod findings;

pub use command::CommandLine;
pub use config::{ActionConfig, InvocationMode, Repository};
pub use error::{Error, Result};
pub use findings::{Finding, FindingsReport, Level, ReportDecode, Summary};
