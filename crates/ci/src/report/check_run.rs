//! Check run request types and the API seam.
//!
//! The reporter talks to the checks API only through [`CheckRunApi`], so it
//! can run against the real GitHub client or a recording mock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lintcheck_core::Result;
use serde::{Deserialize, Serialize};

/// Check run lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckRunStatus {
    /// Still running; more updates may follow
    InProgress,
    /// Terminal state
    Completed,
}

/// Final verdict of a completed check run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    /// No findings
    Success,
    /// Only warnings or info findings
    Neutral,
    /// At least one error, or the run itself failed
    Failure,
}

/// Severity of a single annotation as GitHub names it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationLevel {
    /// Informational
    Notice,
    /// Warning
    Warning,
    /// Failure
    Failure,
}

/// One inline annotation on a single line of a file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Annotation {
    /// Repository-relative path
    pub path: String,
    /// First line of the span
    pub start_line: u32,
    /// Last line of the span
    pub end_line: u32,
    /// Severity
    pub annotation_level: AnnotationLevel,
    /// Rendered message
    pub message: String,
}

/// The `output` object of a check run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckRunOutput {
    /// Output title
    pub title: String,
    /// Markdown summary
    pub summary: String,
    /// Annotations for this update (at most 50 per call)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

/// Body of `POST /repos/{repo}/check-runs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateCheckRun {
    /// Check run name
    pub name: String,
    /// Commit the check run is attached to
    pub head_sha: String,
    /// Always in progress at creation
    pub status: CheckRunStatus,
    /// Start time
    pub started_at: DateTime<Utc>,
}

impl CreateCheckRun {
    /// A new in-progress check run starting now.
    #[must_use]
    pub fn started(name: impl Into<String>, head_sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            head_sha: head_sha.into(),
            status: CheckRunStatus::InProgress,
            started_at: Utc::now(),
        }
    }
}

/// Body of `PATCH /repos/{repo}/check-runs/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateCheckRun {
    /// Check run name
    pub name: String,
    /// Commit the check run is attached to
    pub head_sha: String,
    /// New status
    pub status: CheckRunStatus,
    /// Completion time, only on the terminal update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Verdict, only on the terminal update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<CheckConclusion>,
    /// Output, absent on the forced failure update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<CheckRunOutput>,
}

impl UpdateCheckRun {
    /// An in-progress update carrying `output`.
    #[must_use]
    pub fn in_progress(
        name: impl Into<String>,
        head_sha: impl Into<String>,
        output: CheckRunOutput,
    ) -> Self {
        Self {
            name: name.into(),
            head_sha: head_sha.into(),
            status: CheckRunStatus::InProgress,
            completed_at: None,
            conclusion: None,
            output: Some(output),
        }
    }

    /// The terminal update, completed now.
    #[must_use]
    pub fn completed(
        name: impl Into<String>,
        head_sha: impl Into<String>,
        conclusion: CheckConclusion,
        output: Option<CheckRunOutput>,
    ) -> Self {
        Self {
            name: name.into(),
            head_sha: head_sha.into(),
            status: CheckRunStatus::Completed,
            completed_at: Some(Utc::now()),
            conclusion: Some(conclusion),
            output,
        }
    }
}

/// Trait for check run API operations.
///
/// Each call is a single attempt; failures surface as errors.
#[async_trait]
pub trait CheckRunApi: Send + Sync {
    /// Create a new check run and return its ID.
    async fn create_check_run(&self, request: &CreateCheckRun) -> Result<u64>;

    /// Update an existing check run.
    async fn update_check_run(&self, check_run_id: u64, request: &UpdateCheckRun) -> Result<()>;
}
