//! # cadence-sync
//!
//! The staged synchronization pipeline: collection, transformation,
//! integrity checking, and integration, driven by [`SyncOrchestrator`].
//!
//! Call [`SyncOrchestrator::run`] with [`SyncOptions`] to produce one
//! [`SyncReport`]. Stage failures are captured structurally into the
//! report; only a concurrent-run rejection surfaces as an error.

pub mod collect;
pub mod error;
pub mod integrate;
pub mod integrity;
pub mod options;
pub mod orchestrator;
pub mod progress;
pub mod result;
pub mod transform;

pub use error::WorkflowError;
pub use options::SyncOptions;
pub use orchestrator::SyncOrchestrator;
pub use progress::{
    ChannelProgress, LogProgress, NullProgress, ProgressEvent, ProgressSink, SyncStage,
};
pub use result::{
    CollectionOutput, IntegrationOutput, IntegrityReport, StageResults, SyncMetrics, SyncReport,
    TransformOutput,
};
