//! GitHub provider implementation for lintcheck.
//!
//! This crate provides [`GitHubChecksClient`], the [`CheckRunApi`]
//! implementation that talks to the GitHub Checks REST API.
//!
//! [`CheckRunApi`]: lintcheck_ci::report::CheckRunApi

#![warn(missing_docs)]

pub mod checks;

// Re-exports for convenience
pub use checks::{CHECKS_ACCEPT, GitHubChecksClient, USER_AGENT};
