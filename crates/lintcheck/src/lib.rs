//! lintcheck: run a linter and publish its findings as a GitHub check run.
//!
//! The binary wires three pieces together: a [`CommandLinter`] that runs the
//! tool, a [`GitHubChecksClient`] that talks to the checks API, and the
//! [`CheckRunReporter`] that drives the check run lifecycle between them.

pub mod cli;
pub mod tracing;

use lintcheck_ci::{CheckRunReporter, CommandLinter, ReporterConfig, RunOutcome};
use lintcheck_core::{ActionConfig, Result};
use lintcheck_github::GitHubChecksClient;

/// Run the configured linter and report the result.
///
/// # Errors
///
/// Returns the first error of the run. If the check run had already been
/// created it has been marked as failed by the time this returns.
pub async fn execute(config: &ActionConfig) -> Result<RunOutcome> {
    let client = GitHubChecksClient::from_config(config)?;
    let linter = CommandLinter::new(config.command.clone()).with_mode(config.mode);
    let reporter = CheckRunReporter::new(client, linter, ReporterConfig::from(config));

    ::tracing::info!(
        repository = %config.repository,
        sha = %config.head_sha,
        command = %config.command,
        "Starting lint run"
    );
    reporter.run().await
}
