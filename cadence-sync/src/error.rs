//! Error types for cadence-sync.
//!
//! Stage-internal failures never surface here — they are captured into the
//! owning stage's error list inside [`SyncReport`](crate::result::SyncReport).
//! Only orchestrator-level conditions escape as `WorkflowError`.

use thiserror::Error;

/// Failures at the orchestration layer itself.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A run is already in flight for this orchestrator; the call was
    /// rejected before touching any stage. Callers retry on their own
    /// schedule — there is no queue.
    #[error("a sync run is already in progress")]
    Busy,

    /// The orchestrator's own sequencing failed outside any stage. Folded
    /// into an aborted report by [`run`](crate::orchestrator::SyncOrchestrator::run);
    /// callers matching on this variant see it in `report.errors`, not as `Err`.
    #[error("workflow aborted: {message}")]
    Fatal { message: String },
}

impl WorkflowError {
    pub fn fatal(message: impl Into<String>) -> Self {
        WorkflowError::Fatal {
            message: message.into(),
        }
    }
}
