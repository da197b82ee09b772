//! Linter Runner
//!
//! Spawns the linter, drains stdout and stderr concurrently while waiting
//! for exit, and decodes stdout as a findings report.

use async_trait::async_trait;
use lintcheck_core::config::InvocationMode;
use lintcheck_core::{CommandLine, Error, FindingsReport, ReportDecode, Result};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// Default shell path for shell-mode execution
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Everything captured from one linter run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
    /// Exit code, `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Result of decoding stdout
    pub decoded: ReportDecode,
}

impl ToolOutput {
    /// Build an output record, decoding `stdout`.
    #[must_use]
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, exit_code: Option<i32>) -> Self {
        let stdout = stdout.into();
        let decoded = ReportDecode::decode(&stdout);
        Self {
            stdout,
            stderr: stderr.into(),
            exit_code,
            decoded,
        }
    }

    /// The decoded findings report, if stdout held one.
    #[must_use]
    pub fn report(&self) -> Option<&FindingsReport> {
        self.decoded.report()
    }
}

/// Something that runs the linter once.
#[async_trait]
pub trait Linter: Send + Sync {
    /// Run the linter to completion.
    ///
    /// Only failure to start the process is an error; whatever the linter
    /// prints or returns is captured in the [`ToolOutput`].
    async fn run(&self) -> Result<ToolOutput>;
}

/// Runs a tokenized command as a child process.
#[derive(Debug, Clone)]
pub struct CommandLinter {
    command: CommandLine,
    mode: InvocationMode,
    current_dir: Option<PathBuf>,
}

impl CommandLinter {
    /// Create a runner that execs `command` directly.
    #[must_use]
    pub fn new(command: CommandLine) -> Self {
        Self {
            command,
            mode: InvocationMode::Direct,
            current_dir: None,
        }
    }

    /// Choose between direct and shell invocation.
    #[must_use]
    pub const fn with_mode(mut self, mode: InvocationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Run the linter from `dir` instead of the current directory.
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    fn build(&self) -> Result<(String, Command)> {
        let (program, mut cmd) = match self.mode {
            InvocationMode::Direct => {
                tracing::debug!(program = %self.command.program, args = ?self.command.args, "Running in direct mode");
                let mut c = Command::new(&self.command.program);
                c.args(&self.command.args);
                (self.command.program.clone(), c)
            }
            InvocationMode::Shell => {
                let shell_cmd = self.command.to_shell_string()?;
                tracing::debug!(shell_cmd = %shell_cmd, shell = DEFAULT_SHELL, "Running in shell mode");
                let mut c = Command::new(DEFAULT_SHELL);
                c.arg("-c").arg(shell_cmd);
                (DEFAULT_SHELL.to_string(), c)
            }
        };

        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        Ok((program, cmd))
    }
}

#[async_trait]
impl Linter for CommandLinter {
    #[tracing::instrument(name = "run_linter", skip(self), fields(command = %self.command))]
    async fn run(&self) -> Result<ToolOutput> {
        let (program, mut cmd) = self.build()?;
        let start = std::time::Instant::now();

        let mut child = cmd
            .spawn()
            .map_err(|source| Error::Launch { program, source })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Io(std::io::Error::other("linter stdout was not captured")))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::Io(std::io::Error::other("linter stderr was not captured")))?;

        let (stdout, stderr, status) = tokio::join!(
            drain(stdout, "stdout"),
            drain(stderr, "stderr"),
            child.wait()
        );
        let status = status?;

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            exit_code = ?status.code(),
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            duration_ms,
            "Linter finished"
        );

        let output = ToolOutput::new(stdout, stderr, status.code());
        match &output.decoded {
            ReportDecode::Report(report) => {
                tracing::debug!(findings = report.findings.len(), "Decoded findings report");
            }
            ReportDecode::WrongShape(reason) => {
                tracing::warn!(%reason, "Linter printed JSON that is not a findings report");
            }
            ReportDecode::NotJson(reason) => {
                tracing::debug!(%reason, "Linter output is not JSON");
            }
        }
        Ok(output)
    }
}

/// Read a stream to its end. A read error keeps whatever arrived before it.
async fn drain<R: AsyncRead + Unpin>(mut reader: R, stream: &'static str) -> String {
    let mut buf = Vec::new();
    if let Err(e) = reader.read_to_end(&mut buf).await {
        tracing::warn!(stream, error = %e, "Failed to read linter output");
    }
    String::from_utf8_lossy(&buf).into_owned()
}
