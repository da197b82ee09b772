//! Error handling for lintcheck

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for lintcheck operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Invalid or missing configuration
    #[error("Configuration error: {message}")]
    #[diagnostic(code(lintcheck::config))]
    Configuration {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },

    /// The linter command string could not be split into arguments
    #[error("Cannot tokenize command `{command}`: unterminated quote or trailing escape")]
    #[diagnostic(
        code(lintcheck::command::tokenize),
        help("Balance every single and double quote in the lint command")
    )]
    Tokenize {
        /// The offending command string
        command: String,
    },

    /// The linter command string contains no program
    #[error("Lint command is empty")]
    #[diagnostic(code(lintcheck::command::empty))]
    EmptyCommand,

    /// The linter process could not be started
    #[error("Failed to launch `{program}`: {source}")]
    #[diagnostic(
        code(lintcheck::launch),
        help("Check that the linter is installed and on PATH")
    )]
    Launch {
        /// Program that failed to start
        program: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// IO error while talking to the linter process
    #[error("IO error: {0}")]
    #[diagnostic(code(lintcheck::io))]
    Io(#[from] std::io::Error),

    /// Transport-level HTTP failure
    #[error("HTTP request for {operation} failed: {message}")]
    #[diagnostic(code(lintcheck::http))]
    Http {
        /// The API operation being performed
        operation: &'static str,
        /// Transport error message
        message: String,
    },

    /// The checks API answered with a non-success status
    #[error("GitHub API rejected {operation} (HTTP {status})")]
    #[diagnostic(code(lintcheck::api))]
    Api {
        /// The API operation being performed
        operation: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body, kept as diagnostic payload
        #[help]
        body: Option<String>,
    },

    /// A response body could not be decoded
    #[error("Failed to decode {what}: {message}")]
    #[diagnostic(code(lintcheck::decode))]
    Decode {
        /// What was being decoded
        what: &'static str,
        /// Decoder error message
        message: String,
    },

    /// The linter wrote to stderr
    #[error("Failed to run linter")]
    #[diagnostic(code(lintcheck::tool_failed))]
    ToolFailed {
        /// Captured stderr of the linter
        #[help]
        stderr: String,
    },
}

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            help: None,
        }
    }

    /// Create a configuration error with help text
    #[must_use]
    pub fn configuration_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a transport error for an API operation
    #[must_use]
    pub fn http(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Http {
            operation,
            message: message.into(),
        }
    }

    /// Create an API status error, dropping an empty body
    #[must_use]
    pub fn api(operation: &'static str, status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::Api {
            operation,
            status,
            body: (!body.trim().is_empty()).then_some(body),
        }
    }

    /// Create a decode error
    #[must_use]
    pub fn decode(what: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            what,
            message: message.into(),
        }
    }

    /// Diagnostic payload captured alongside the error, if any
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::ToolFailed { stderr } => Some(stderr),
            Self::Api { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}

/// Result type alias for lintcheck operations
pub type Result<T> = std::result::Result<T, Error>;
