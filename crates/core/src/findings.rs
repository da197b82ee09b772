//! The linter's JSON findings report.
//!
//! The shape follows clj-kondo's `{:output {:format :json}}` output:
//!
//! ```json
//! {
//!   "findings": [
//!     {"filename": "src/a.clj", "level": "warning", "type": "unused-binding",
//!      "row": 3, "col": 9, "message": "unused binding x"}
//!   ],
//!   "summary": {"error": 0, "warning": 1, "info": 0, "duration": 42}
//! }
//! ```
//!
//! Fields the reporter does not use (`end-row`, `langs`, `files`, ...) are
//! accepted and ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a single finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// One issue reported by the linter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Finding {
    /// Path of the offending file
    pub filename: String,
    /// Severity
    pub level: Level,
    /// Rule or category tag (e.g. `unresolved-symbol`)
    #[serde(rename = "type")]
    pub kind: String,
    /// 1-based line
    pub row: u32,
    /// 1-based column
    pub col: u32,
    /// Human readable message
    pub message: String,
}

/// Aggregate counts reported by the linter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    /// Linting time in milliseconds
    pub duration: u64,
    /// Number of error findings
    pub error: u64,
    /// Number of warning findings
    pub warning: u64,
    /// Number of info findings
    pub info: u64,
}

impl Summary {
    /// Count levels across `findings`.
    #[must_use]
    pub fn tally(findings: &[Finding], duration: u64) -> Self {
        findings.iter().fold(
            Self {
                duration,
                ..Self::default()
            },
            |mut acc, f| {
                match f.level {
                    Level::Error => acc.error += 1,
                    Level::Warning => acc.warning += 1,
                    Level::Info => acc.info += 1,
                }
                acc
            },
        )
    }

    /// Whether the counts match the levels of `findings`.
    #[must_use]
    pub fn is_consistent_with(&self, findings: &[Finding]) -> bool {
        let counted = Self::tally(findings, self.duration);
        counted == *self
    }
}

/// The complete report emitted on the linter's stdout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FindingsReport {
    /// Findings in the order the linter reported them
    pub findings: Vec<Finding>,
    /// Aggregate counts; authoritative for the check conclusion
    pub summary: Summary,
}

/// Outcome of decoding the linter's stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportDecode {
    /// A well-formed findings report
    Report(FindingsReport),
    /// Valid JSON that does not match the report schema
    WrongShape(String),
    /// Not JSON at all
    NotJson(String),
}

impl ReportDecode {
    /// Decode `stdout`, telling malformed JSON apart from a schema mismatch.
    #[must_use]
    pub fn decode(stdout: &str) -> Self {
        let value: serde_json::Value = match serde_json::from_str(stdout) {
            Ok(value) => value,
            Err(e) => return Self::NotJson(e.to_string()),
        };
        match serde_json::from_value::<FindingsReport>(value) {
            Ok(report) => {
                if !report.summary.is_consistent_with(&report.findings) {
                    tracing::warn!(
                        summary = ?report.summary,
                        counted = ?Summary::tally(&report.findings, report.summary.duration),
                        "Linter summary does not match reported findings; using summary"
                    );
                }
                Self::Report(report)
            }
            Err(e) => Self::WrongShape(e.to_string()),
        }
    }

    /// The report, if decoding succeeded.
    #[must_use]
    pub fn report(&self) -> Option<&FindingsReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::WrongShape(_) | Self::NotJson(_) => None,
        }
    }
}
