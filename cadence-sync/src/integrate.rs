//! Integration stage — hands the validated hierarchy to the outside world.
//!
//! Sub-steps in order: timed view render, notification dispatch, cache
//! write. The first failure is recorded and the remaining sub-steps are
//! skipped for this run; the workflow itself still completes.

use std::time::Instant;

use cadence_core::collab::{CacheStore, NotificationChannel, ViewSink};
use cadence_core::types::{Group, Item};

use crate::result::IntegrationOutput;

/// Run the integration stage.
pub fn run(
    view: &dyn ViewSink,
    notifier: &dyn NotificationChannel,
    cache: &dyn CacheStore,
    groups: &[Group],
    items: &[Item],
) -> IntegrationOutput {
    let mut out = IntegrationOutput::default();

    let started = Instant::now();
    if let Err(err) = view.render(groups, items) {
        tracing::warn!("view update failed: {err}");
        out.errors.push(format!("view update failed: {err}"));
        return out;
    }
    out.view_update_ms = started.elapsed().as_millis();
    tracing::debug!("view updated in {}ms", out.view_update_ms);

    match notifier.notify(groups.len(), items.len()) {
        Ok(sent) => out.notifications_sent = sent,
        Err(err) => {
            tracing::warn!("notification dispatch failed: {err}");
            out.errors.push(format!("notification dispatch failed: {err}"));
            return out;
        }
    }

    match cache.write(groups, items) {
        Ok(updated) => out.cache_updated = updated,
        Err(err) => {
            tracing::warn!("cache write failed: {err}");
            out.errors.push(format!("cache write failed: {err}"));
        }
    }

    out
}
