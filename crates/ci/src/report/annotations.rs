//! Translation of findings into check run annotations and verdicts.

use super::check_run::{Annotation, AnnotationLevel, CheckConclusion};
use lintcheck_core::{Finding, Level, Summary};

/// The checks API accepts at most this many annotations per request.
pub const MAX_ANNOTATIONS_PER_UPDATE: usize = 50;

impl From<Level> for AnnotationLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Info => Self::Notice,
            Level::Warning => Self::Warning,
            Level::Error => Self::Failure,
        }
    }
}

impl From<&Finding> for Annotation {
    fn from(finding: &Finding) -> Self {
        Self {
            path: finding.filename.clone(),
            start_line: finding.row,
            end_line: finding.row,
            annotation_level: finding.level.into(),
            message: format!("[{}] {}", finding.kind, finding.message),
        }
    }
}

impl CheckConclusion {
    /// Verdict for a summary: any error fails, any warning or info is
    /// neutral, nothing at all succeeds.
    #[must_use]
    pub const fn from_summary(summary: &Summary) -> Self {
        if summary.error > 0 {
            Self::Failure
        } else if summary.warning > 0 || summary.info > 0 {
            Self::Neutral
        } else {
            Self::Success
        }
    }
}

/// Split findings into order-preserving batches of at most
/// [`MAX_ANNOTATIONS_PER_UPDATE`]. No findings means no batches.
pub fn chunk_findings(findings: &[Finding]) -> impl Iterator<Item = &[Finding]> {
    findings.chunks(MAX_ANNOTATIONS_PER_UPDATE)
}

/// Convert one batch of findings.
#[must_use]
pub fn annotations_for(chunk: &[Finding]) -> Vec<Annotation> {
    chunk.iter().map(Annotation::from).collect()
}

/// One-line summary shown on every update.
#[must_use]
pub fn summary_text(summary: &Summary) -> String {
    format!(
        "linting took {}ms, errors: {}, warnings: {}, info: {}",
        summary.duration, summary.error, summary.warning, summary.info
    )
}
