//! Linter command line tokenization.
//!
//! The linter is configured as one shell-style string. It is split the way a
//! POSIX shell splits words (unquoted whitespace separates, single and double
//! quoted runs are atomic, backslash escapes apply) without any expansion.
//! Unterminated quotes are rejected rather than guessed at.

use crate::{Error, Result};
use std::fmt;

/// A tokenized linter invocation: the program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Program name or path (first token)
    pub program: String,
    /// Remaining tokens, in source order
    pub args: Vec<String>,
}

impl CommandLine {
    /// Split `command` into a program and its arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tokenize`] for an unterminated quote or a trailing
    /// backslash, and [`Error::EmptyCommand`] when no token is present.
    pub fn parse(command: &str) -> Result<Self> {
        let mut tokens = tokenize(command)?.into_iter();
        let program = tokens.next().ok_or(Error::EmptyCommand)?;
        Ok(Self {
            program,
            args: tokens.collect(),
        })
    }

    /// All tokens, program first.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }

    /// Re-quote the tokens into a string a POSIX shell splits back into the
    /// same argv.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tokenize`] if a token contains a NUL byte, which no
    /// shell string can carry.
    pub fn to_shell_string(&self) -> Result<String> {
        shlex::try_join(self.tokens()).map_err(|_| Error::Tokenize {
            command: self.to_string(),
        })
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Split a command string into tokens.
///
/// # Errors
///
/// Returns [`Error::Tokenize`] when a quote is left open or the string ends
/// with a lone backslash.
pub fn tokenize(command: &str) -> Result<Vec<String>> {
    shlex::split(command).ok_or_else(|| Error::Tokenize {
        command: command.to_string(),
    })
}
