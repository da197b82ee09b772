//! Check Run Reporter
//!
//! Drives one lint run end to end: create the check run, run the linter,
//! stream annotations in batches, and conclude. Any error after the check
//! run exists forces it to a failed terminal state before the error is
//! handed back to the caller.

use std::io::Write;
use std::sync::Mutex;

use lintcheck_core::{ActionConfig, Error, FindingsReport, Result};

use super::annotations::{annotations_for, chunk_findings, summary_text};
use super::check_run::{CheckConclusion, CheckRunApi, CheckRunOutput, CreateCheckRun, UpdateCheckRun};
use crate::runner::Linter;

/// Exit code used when the linter was terminated by a signal.
pub const EXIT_SIGNALLED: i32 = 1;

/// Configuration for the check run reporter.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Check run name, also used as output title
    pub check_name: String,
    /// Commit the check run is attached to
    pub sha: String,
    /// Base for human links, e.g. `https://github.com/owner/repo/runs`
    pub runs_url: String,
}

impl ReporterConfig {
    /// Create a reporter config for `sha`.
    #[must_use]
    pub fn new(check_name: impl Into<String>, sha: impl Into<String>, runs_url: impl Into<String>) -> Self {
        Self {
            check_name: check_name.into(),
            sha: sha.into(),
            runs_url: runs_url.into(),
        }
    }

    fn run_url(&self, check_run_id: u64) -> String {
        format!("{}/{}", self.runs_url, check_run_id)
    }
}

impl From<&ActionConfig> for ReporterConfig {
    fn from(config: &ActionConfig) -> Self {
        Self {
            check_name: config.check_name.clone(),
            sha: config.head_sha.clone(),
            runs_url: config.runs_url(),
        }
    }
}

/// What a completed run reports back to the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// ID of the check run that was created
    pub check_run_id: u64,
    /// Verdict, `None` when the linter output could not be parsed
    pub conclusion: Option<CheckConclusion>,
    /// Exit code the process should terminate with
    pub exit_code: i32,
}

/// Publishes one linter run as a check run.
pub struct CheckRunReporter<A: CheckRunApi, L: Linter> {
    api: A,
    linter: L,
    config: ReporterConfig,
    console: Mutex<Box<dyn Write + Send>>,
}

impl<A: CheckRunApi, L: Linter> CheckRunReporter<A, L> {
    /// Create a reporter that prints to stdout.
    #[must_use]
    pub fn new(api: A, linter: L, config: ReporterConfig) -> Self {
        Self {
            api,
            linter,
            config,
            console: Mutex::new(Box::new(std::io::stdout())),
        }
    }

    /// Send console output somewhere other than stdout.
    #[must_use]
    pub fn with_console(mut self, console: impl Write + Send + 'static) -> Self {
        self.console = Mutex::new(Box::new(console));
        self
    }

    /// The API client.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Run the linter and publish its findings.
    ///
    /// # Errors
    ///
    /// Returns the creation error if the check run cannot be opened. Every
    /// later error (launch failure, API rejection, linter stderr) is returned
    /// after the check run has been forced to `completed`/`failure`.
    #[tracing::instrument(name = "check_run", skip(self), fields(check = %self.config.check_name, sha = %self.config.sha))]
    pub async fn run(&self) -> Result<RunOutcome> {
        let create = CreateCheckRun::started(&self.config.check_name, &self.config.sha);
        let check_run_id = self.api.create_check_run(&create).await?;
        tracing::info!(check_run_id, "Created check run");

        match self.lint_and_report(check_run_id).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                tracing::error!(check_run_id, error = %err, "Run failed, marking check run as failed");
                self.force_failure(check_run_id).await;
                Err(err)
            }
        }
    }

    async fn lint_and_report(&self, check_run_id: u64) -> Result<RunOutcome> {
        let output = self.linter.run().await?;

        let conclusion = if let Some(report) = output.report() {
            Some(self.post_results(check_run_id, report).await?)
        } else {
            tracing::warn!(check_run_id, "Skipping annotations, linter output was not a findings report");
            self.say("Unable to parse linter JSON output.");
            self.say(&output.stdout);
            None
        };

        if !output.stderr.is_empty() {
            return Err(Error::ToolFailed {
                stderr: output.stderr,
            });
        }

        Ok(RunOutcome {
            check_run_id,
            conclusion,
            exit_code: output.exit_code.unwrap_or(EXIT_SIGNALLED),
        })
    }

    async fn post_results(&self, check_run_id: u64, report: &FindingsReport) -> Result<CheckConclusion> {
        let summary = summary_text(&report.summary);

        for (batch, chunk) in chunk_findings(&report.findings).enumerate() {
            let update = UpdateCheckRun::in_progress(
                &self.config.check_name,
                &self.config.sha,
                CheckRunOutput {
                    title: self.config.check_name.clone(),
                    summary: summary.clone(),
                    annotations: annotations_for(chunk),
                },
            );
            self.api.update_check_run(check_run_id, &update).await?;
            tracing::debug!(check_run_id, batch, annotations = chunk.len(), "Posted annotations");
        }

        let conclusion = CheckConclusion::from_summary(&report.summary);
        if conclusion != CheckConclusion::Success {
            self.say(&format!(
                "Linter detected some problems. Please check found problems at {}",
                self.config.run_url(check_run_id)
            ));
        }

        let update = UpdateCheckRun::completed(
            &self.config.check_name,
            &self.config.sha,
            conclusion,
            Some(CheckRunOutput {
                title: self.config.check_name.clone(),
                summary,
                annotations: vec![],
            }),
        );
        self.api.update_check_run(check_run_id, &update).await?;
        tracing::info!(check_run_id, ?conclusion, findings = report.findings.len(), "Completed check run");

        Ok(conclusion)
    }

    async fn force_failure(&self, check_run_id: u64) {
        let update = UpdateCheckRun::completed(
            &self.config.check_name,
            &self.config.sha,
            CheckConclusion::Failure,
            None,
        );
        if let Err(e) = self.api.update_check_run(check_run_id, &update).await {
            tracing::warn!(check_run_id, error = %e, "Failed to mark check run as failed");
        }
    }

    fn say(&self, line: &str) {
        if let Ok(mut console) = self.console.lock()
            && let Err(e) = writeln!(console, "{line}")
        {
            tracing::debug!(error = %e, "Failed to write console output");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_action_config() {
        let action = ActionConfig::new("kondo", "t", "acme/widgets", "abc123", "clj-kondo --lint src")
            .unwrap()
            .with_server_url("https://ghe.example.com/");
        let config = ReporterConfig::from(&action);
        assert_eq!(config.check_name, "kondo");
        assert_eq!(config.sha, "abc123");
        assert_eq!(config.runs_url, "https://ghe.example.com/acme/widgets/runs");
        assert_eq!(
            config.run_url(7),
            "https://ghe.example.com/acme/widgets/runs/7"
        );
    }
}
