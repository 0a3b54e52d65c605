//! The notification surface consumed by the embedding presentation layer.
//!
//! The SDK makes no rendering decisions; it reports phase transitions and
//! the final result through [`StatusSink`], and the embedder decides what a
//! spinner or a button does with them.

use std::fmt;

use crate::types::MediaKind;

/// A phase of a pipeline run, rendered as the exact free-form labels the
/// hosted frontend displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The source file is being transferred to storage.
    Uploading,
    /// The upload finished; the pipeline can be started.
    Ready,
    /// The generation job is being submitted.
    SubmittingJob,
    /// The job was accepted and is waiting to be processed.
    JobQueued,
    /// The job is still processing; carries the 1-based poll attempt.
    Processing(u32),
    /// The result URL has been resolved.
    Complete,
    /// A stage failed terminally.
    Error,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Uploading => write!(f, "UPLOADING..."),
            Phase::Ready => write!(f, "READY"),
            Phase::SubmittingJob => write!(f, "SUBMITTING JOB..."),
            Phase::JobQueued => write!(f, "JOB QUEUED..."),
            Phase::Processing(attempt) => write!(f, "PROCESSING... ({attempt})"),
            Phase::Complete => write!(f, "COMPLETE"),
            Phase::Error => write!(f, "ERROR"),
        }
    }
}

/// Receives pipeline notifications.
///
/// Both callbacks default to no-ops so an embedder can implement only what
/// it renders. Implementations must be cheap; they are invoked inline from
/// the pipeline.
pub trait StatusSink: Send + Sync {
    /// A phase transition occurred.
    fn phase(&self, _phase: Phase) {}

    /// The canonical media URL is available, with a kind hint sniffed from
    /// its extension.
    fn result_ready(&self, _url: &str, _kind: MediaKind) {}
}

/// The default sink: routes notifications to `tracing`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn phase(&self, phase: Phase) {
        tracing::info!(%phase, "pipeline status");
    }

    fn result_ready(&self, url: &str, kind: MediaKind) {
        tracing::info!(url, ?kind, "result ready");
    }
}
