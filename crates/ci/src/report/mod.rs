//! Check Run Reporting
//!
//! Provides the pieces that turn a linter run into a GitHub check run:
//! - Request types and the [`CheckRunApi`] seam
//! - Finding to annotation translation, batching and verdicts
//! - The [`CheckRunReporter`] orchestrator

pub mod annotations;
pub mod check_run;
pub mod reporter;

// Re-export commonly used types
pub use annotations::{MAX_ANNOTATIONS_PER_UPDATE, annotations_for, chunk_findings, summary_text};
pub use check_run::{
    Annotation, AnnotationLevel, CheckConclusion, CheckRunApi, CheckRunOutput, CheckRunStatus,
    CreateCheckRun, UpdateCheckRun,
};
pub use reporter::{CheckRunReporter, EXIT_SIGNALLED, ReporterConfig, RunOutcome};
