//! Progress reporting for the pipeline.
//!
//! Reports are fire-and-forget: a sink must not panic and has no way to
//! fail the run. The orchestrator emits at fixed stage boundaries, in
//! stage order, at most once per boundary.

use std::fmt;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use serde::Serialize;

/// One sequential phase of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStage {
    Collection,
    Transformation,
    Validation,
    Integration,
    Complete,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStage::Collection => write!(f, "collection"),
            SyncStage::Transformation => write!(f, "transformation"),
            SyncStage::Validation => write!(f, "validation"),
            SyncStage::Integration => write!(f, "integration"),
            SyncStage::Complete => write!(f, "complete"),
        }
    }
}

/// Observer of stage-boundary progress.
pub trait ProgressSink: Send + Sync {
    fn report(&self, stage: SyncStage, percent: u8, message: &str);
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&self, _stage: SyncStage, _percent: u8, _message: &str) {}
}

/// Logs every report through the log facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, stage: SyncStage, percent: u8, message: &str) {
        tracing::info!("[{stage} {percent}%] {message}");
    }
}

/// One progress report, as carried by [`ChannelProgress`].
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    pub stage: SyncStage,
    pub percent: u8,
    pub message: String,
}

/// Forwards reports into a bounded channel.
///
/// A full or disconnected channel drops the event — a slow consumer can
/// lose progress updates but can never stall or fail the run.
#[derive(Debug)]
pub struct ChannelProgress {
    tx: SyncSender<ProgressEvent>,
}

impl ChannelProgress {
    /// Create a sink and its consumer end with the given channel bound.
    pub fn new(bound: usize) -> (Self, Receiver<ProgressEvent>) {
        let (tx, rx) = sync_channel(bound);
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelProgress {
    fn report(&self, stage: SyncStage, percent: u8, message: &str) {
        let _ = self.tx.try_send(ProgressEvent {
            stage,
            percent,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_progress_delivers_events_in_order() {
        let (sink, rx) = ChannelProgress::new(8);
        sink.report(SyncStage::Collection, 10, "collecting");
        sink.report(SyncStage::Collection, 35, "collected");

        let first = rx.recv().expect("first event");
        assert_eq!(first.stage, SyncStage::Collection);
        assert_eq!(first.percent, 10);
        let second = rx.recv().expect("second event");
        assert_eq!(second.percent, 35);
    }

    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let (sink, rx) = ChannelProgress::new(1);
        sink.report(SyncStage::Collection, 10, "kept");
        sink.report(SyncStage::Collection, 35, "dropped");

        assert_eq!(rx.recv().expect("kept event").percent, 10);
        assert!(rx.try_recv().is_err(), "second event must have been dropped");
    }

    #[test]
    fn disconnected_consumer_is_ignored() {
        let (sink, rx) = ChannelProgress::new(1);
        drop(rx);
        // Must not panic.
        sink.report(SyncStage::Complete, 100, "done");
    }

    #[test]
    fn stage_display() {
        assert_eq!(SyncStage::Collection.to_string(), "collection");
        assert_eq!(SyncStage::Complete.to_string(), "complete");
    }
}
