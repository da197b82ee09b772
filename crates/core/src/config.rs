//! Action configuration.
//!
//! Everything the run needs from its environment is collected once into an
//! [`ActionConfig`] at process entry and handed down explicitly.

use crate::command::CommandLine;
use crate::{Error, Result};
use secrecy::SecretString;
use std::fmt;
use std::str::FromStr;

/// Default GitHub REST API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default GitHub web endpoint, used for links to check runs
pub const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Default check run name
pub const DEFAULT_CHECK_NAME: &str = "clj-kondo";

/// Default linter invocation
pub const DEFAULT_LINT_COMMAND: &str = "clj-kondo --lint src --config '{:output {:format :json}}'";

/// A GitHub repository in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Owning user or organization
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl FromStr for Repository {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: (*owner).to_string(),
                name: (*name).to_string(),
            }),
            _ => Err(Error::configuration_with_help(
                format!("Invalid repository '{s}'"),
                "Expected the owner/name form of GITHUB_REPOSITORY",
            )),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// How the linter process is started.
///
/// The default does not go through a command interpreter: the tokenized argv
/// is exec'd as is, so quoted arguments reach the linter intact. Joining the
/// tokens back with spaces for an interpreter would re-split them. `Shell`
/// keeps interpreter invocation available and re-quotes every token first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvocationMode {
    /// Exec the program directly with the tokenized argv
    #[default]
    Direct,
    /// Run the re-quoted command through `sh -c`
    Shell,
}

/// Configuration for one lint-and-report run.
#[derive(Debug)]
pub struct ActionConfig {
    /// Display name of the check run
    pub check_name: String,
    /// Token used as bearer credential for the checks API
    pub token: SecretString,
    /// Repository the check run belongs to
    pub repository: Repository,
    /// Commit under test
    pub head_sha: String,
    /// Tokenized linter invocation
    pub command: CommandLine,
    /// How to start the linter
    pub mode: InvocationMode,
    /// REST API base URL, without trailing slash
    pub api_url: String,
    /// Web base URL, without trailing slash
    pub server_url: String,
}

impl ActionConfig {
    /// Build a configuration with default endpoints and direct invocation.
    ///
    /// # Errors
    ///
    /// Fails when `lint_command` cannot be tokenized, `repository` is not in
    /// `owner/name` form, or `head_sha` is blank.
    pub fn new(
        check_name: impl Into<String>,
        token: impl Into<String>,
        repository: &str,
        head_sha: impl Into<String>,
        lint_command: &str,
    ) -> Result<Self> {
        let head_sha = head_sha.into();
        if head_sha.trim().is_empty() {
            return Err(Error::configuration_with_help(
                "Commit SHA is empty",
                "Set GITHUB_SHA or pass --sha",
            ));
        }
        Ok(Self {
            check_name: check_name.into(),
            token: SecretString::from(token.into()),
            repository: repository.parse()?,
            head_sha,
            command: CommandLine::parse(lint_command)?,
            mode: InvocationMode::Direct,
            api_url: DEFAULT_API_URL.to_string(),
            server_url: DEFAULT_SERVER_URL.to_string(),
        })
    }

    /// Set the REST API base URL.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = trim_base(url.into());
        self
    }

    /// Set the web base URL.
    #[must_use]
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = trim_base(url.into());
        self
    }

    /// Set the invocation mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: InvocationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Web page listing the repository's check runs; a run's page is
    /// `{runs_url}/{id}`.
    #[must_use]
    pub fn runs_url(&self) -> String {
        format!("{}/{}/runs", self.server_url, self.repository)
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
