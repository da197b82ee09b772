//! Command line surface of the action.
//!
//! Every flag falls back to the environment variable GitHub Actions sets for
//! the matching action input, so the binary runs unchanged as an action step.

use crate::tracing::{LogLevel, TracingConfig, TracingFormat};
use clap::{ArgAction, Parser};
use lintcheck_core::config::{
    DEFAULT_API_URL, DEFAULT_CHECK_NAME, DEFAULT_LINT_COMMAND, DEFAULT_SERVER_URL,
};
use lintcheck_core::{ActionConfig, Error, InvocationMode, Result};
use miette::Report;

/// Exit code for internal failures
pub const EXIT_FAILURE: i32 = 1;

/// Run a linter and publish its findings as a GitHub check run.
#[derive(Parser, Debug)]
#[command(name = "lintcheck")]
#[command(about = "Run clj-kondo and publish its findings as a GitHub check run")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// Name of the check run.
    #[arg(long, env = "INPUT_CHECK-NAME", default_value = DEFAULT_CHECK_NAME)]
    pub check_name: String,

    /// Token used to call the checks API.
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// Linter command line, split with POSIX shell quoting rules.
    #[arg(long, env = "INPUT_CLJ-KONDO-CMD", default_value = DEFAULT_LINT_COMMAND)]
    pub lint_command: String,

    /// Repository in owner/name form.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: String,

    /// Commit the check run is attached to.
    #[arg(long, env = "GITHUB_SHA")]
    pub sha: String,

    /// GitHub REST API base URL.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// GitHub web base URL, used for links printed to the log.
    #[arg(long, env = "GITHUB_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Run the linter through `sh -c` instead of executing it directly.
    #[arg(long, env = "INPUT_SHELL", action = ArgAction::SetTrue)]
    pub shell: bool,

    /// Logging verbosity level.
    #[arg(
        long,
        env = "LINTCHECK_LOG_LEVEL",
        default_value = "warn",
        value_enum
    )]
    pub log_level: LogLevel,

    /// Log output format.
    #[arg(
        long,
        env = "LINTCHECK_LOG_FORMAT",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,
}

impl Cli {
    /// Tracing settings selected on the command line.
    #[must_use]
    pub fn tracing_config(&self) -> TracingConfig {
        TracingConfig {
            format: self.log_format,
            level: self.log_level.into(),
        }
    }

    /// Validate the arguments into an [`ActionConfig`].
    ///
    /// # Errors
    ///
    /// Fails if the lint command cannot be tokenized, the repository is
    /// malformed or the commit SHA is blank.
    pub fn into_config(self) -> Result<ActionConfig> {
        let mode = if self.shell {
            InvocationMode::Shell
        } else {
            InvocationMode::Direct
        };
        Ok(ActionConfig::new(
            self.check_name,
            self.github_token,
            &self.repository,
            self.sha,
            &self.lint_command,
        )?
        .with_api_url(self.api_url)
        .with_server_url(self.server_url)
        .with_mode(mode))
    }
}

/// Parse the process arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Print an error with its diagnostic help to stderr.
#[allow(clippy::print_stderr)]
pub fn render_error(err: Error) {
    let report = Report::new(err);
    eprintln!("{report:?}");
}
