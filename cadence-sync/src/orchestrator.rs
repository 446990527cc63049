//! Sync orchestrator — drives the four stages as one workflow.
//!
//! Stages run strictly sequentially. A failure inside a stage lands in that
//! stage's own error list and never aborts the later stages; only a failure
//! of the orchestrator's own sequencing aborts the run, and even that is
//! folded into the returned report. The single `Err` a caller can see is
//! [`WorkflowError::Busy`].
//!
//! Progress boundaries: collection 10→35, transformation 40→65,
//! validation 70, integration 90→95, complete 100.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use cadence_core::collab::{CacheStore, DataStore, NotificationChannel, ViewSink};

use crate::error::WorkflowError;
use crate::options::SyncOptions;
use crate::progress::{NullProgress, ProgressSink, SyncStage};
use crate::result::{StageResults, SyncMetrics, SyncReport};
use crate::{collect, integrate, integrity, transform};

// ---------------------------------------------------------------------------
// Run guard
// ---------------------------------------------------------------------------

/// Holds the single-flight flag for the duration of one run.
///
/// Acquisition is a compare-and-set: two near-simultaneous callers cannot
/// both pass. The flag clears on drop, so every exit path — including an
/// unwinding panic — releases it.
struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Composes collection, transformation, integrity checking, and integration
/// into one single-flight workflow.
pub struct SyncOrchestrator {
    store: Arc<dyn DataStore>,
    view: Arc<dyn ViewSink>,
    notifier: Arc<dyn NotificationChannel>,
    cache: Arc<dyn CacheStore>,
    progress: Arc<dyn ProgressSink>,
    running: AtomicBool,
}

impl SyncOrchestrator {
    pub fn new(
        store: Arc<dyn DataStore>,
        view: Arc<dyn ViewSink>,
        notifier: Arc<dyn NotificationChannel>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            store,
            view,
            notifier,
            cache,
            progress: Arc::new(NullProgress),
            running: AtomicBool::new(false),
        }
    }

    /// Replace the default no-op progress sink.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Whether a run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run the full pipeline once.
    ///
    /// Returns `Err(WorkflowError::Busy)` — before touching any stage — if
    /// another run is in flight. Every other outcome, including a fully
    /// failed run, is a `SyncReport`.
    pub fn run(&self, options: &SyncOptions) -> Result<SyncReport, WorkflowError> {
        let _guard = RunGuard::acquire(&self.running).ok_or(WorkflowError::Busy)?;
        let started = Instant::now();
        tracing::info!("sync run started");

        let mut report = match self.drive(options) {
            Ok(report) => report,
            Err(err) => Self::aborted(err.to_string()),
        };
        report.duration_ms = started.elapsed().as_millis();
        self.progress
            .report(SyncStage::Complete, 100, &report.message);
        tracing::info!("sync run finished in {}ms: {}", report.duration_ms, report.message);
        Ok(report)
    }

    /// The stage sequence. An `Err` here means the sequencing itself broke
    /// — never a stage-internal failure, which the stages record in their
    /// own outputs.
    fn drive(&self, options: &SyncOptions) -> Result<SyncReport, WorkflowError> {
        self.progress
            .report(SyncStage::Collection, 10, "collecting records");
        let collection = collect::run(self.store.as_ref(), options);
        self.progress.report(
            SyncStage::Collection,
            35,
            &format!(
                "collected {} project(s), {} sprint(s), {} task(s)",
                collection.projects.len(),
                collection.sprints.len(),
                collection.tasks.len()
            ),
        );

        self.progress
            .report(SyncStage::Transformation, 40, "building hierarchy");
        let transformation = transform::run(
            &collection.projects,
            &collection.sprints,
            &collection.tasks,
        );
        self.progress.report(
            SyncStage::Transformation,
            65,
            &format!(
                "built {} group(s), {} item(s)",
                transformation.groups.len(),
                transformation.items.len()
            ),
        );

        let validation = integrity::check(&transformation.groups, &transformation.items);
        self.progress.report(
            SyncStage::Validation,
            70,
            &format!(
                "{} issue(s), {} warning(s)",
                validation.issues.len(),
                validation.warning_count
            ),
        );

        self.progress
            .report(SyncStage::Integration, 90, "publishing hierarchy");
        let integration = integrate::run(
            self.view.as_ref(),
            self.notifier.as_ref(),
            self.cache.as_ref(),
            &transformation.groups,
            &transformation.items,
        );
        self.progress.report(
            SyncStage::Integration,
            95,
            &format!(
                "{} notification(s) sent, cache updated: {}",
                integration.notifications_sent, integration.cache_updated
            ),
        );

        let mut errors: Vec<String> = Vec::new();
        errors.extend(collection.errors.iter().cloned());
        errors.extend(transformation.mapping_errors.iter().cloned());
        errors.extend(validation.issues.iter().cloned());
        errors.extend(integration.errors.iter().cloned());
        let warnings = validation.warnings.clone();

        let metrics = SyncMetrics {
            total_projects: collection.projects.len(),
            total_sprints: collection.sprints.len(),
            total_tasks: collection.tasks.len(),
            total_groups: transformation.groups.len(),
            total_items: transformation.items.len(),
            error_count: errors.len(),
            warning_count: warnings.len(),
        };
        let success = errors.is_empty();
        let message = if success {
            format!(
                "sync completed: {} group(s), {} item(s)",
                metrics.total_groups, metrics.total_items
            )
        } else {
            format!("sync completed with {} error(s)", errors.len())
        };

        Ok(SyncReport {
            success,
            message,
            duration_ms: 0,
            stages: StageResults {
                collection: Some(collection),
                transformation: Some(transformation),
                validation: Some(validation),
                integration: Some(integration),
            },
            metrics,
            errors,
            warnings,
        })
    }

    /// Report shape for a run aborted outside any stage: one top-level
    /// error, no stage outputs.
    fn aborted(message: String) -> SyncReport {
        SyncReport {
            success: false,
            message: format!("sync aborted: {message}"),
            errors: vec![message],
            ..SyncReport::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::error::StoreError;
    use cadence_core::types::{
        Group, Item, Project, ProjectId, ProjectStatus, Sprint, SprintId, Task, TaskId,
    };
    use cadence_core::MemoryStore;
    use chrono::{TimeZone, Utc};

    struct NullView;
    impl ViewSink for NullView {
        fn render(&self, _: &[Group], _: &[Item]) -> Result<(), StoreError> {
            Ok(())
        }
    }

    struct NullNotifier;
    impl NotificationChannel for NullNotifier {
        fn notify(&self, _: usize, _: usize) -> Result<usize, StoreError> {
            Ok(0)
        }
    }

    struct NullCache;
    impl CacheStore for NullCache {
        fn write(&self, _: &[Group], _: &[Item]) -> Result<bool, StoreError> {
            Ok(true)
        }
    }

    fn orchestrator(store: MemoryStore) -> SyncOrchestrator {
        SyncOrchestrator::new(
            Arc::new(store),
            Arc::new(NullView),
            Arc::new(NullNotifier),
            Arc::new(NullCache),
        )
    }

    fn seeded_store() -> MemoryStore {
        let start = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap();
        MemoryStore::new()
            .with_projects(vec![Project {
                id: ProjectId::from("P1"),
                name: "Copnow".to_string(),
                status: ProjectStatus::Active,
            }])
            .with_sprints(vec![Sprint {
                id: SprintId::from("S1"),
                project_id: ProjectId::from("P1"),
                name: "Sprint 1".to_string(),
                start_date: start,
                end_date: end,
            }])
            .with_tasks(vec![Task {
                id: TaskId::from("T1"),
                project_id: Some(ProjectId::from("P1")),
                sprint_id: Some(SprintId::from("S1")),
                status: Default::default(),
                priority: Default::default(),
                title: "Ship it".to_string(),
                description: None,
                due_date: None,
                tags: vec![],
            }])
    }

    #[test]
    fn happy_path_report() {
        let orch = orchestrator(seeded_store());
        let report = orch.run(&SyncOptions::default()).expect("run");

        assert!(report.success, "errors: {:?}", report.errors);
        assert_eq!(report.metrics.total_projects, 1);
        assert_eq!(report.metrics.total_groups, 2);
        assert_eq!(report.metrics.total_items, 1);
        assert_eq!(report.metrics.error_count, 0);
        assert!(report.stages.collection.is_some());
        assert!(report.stages.integration.is_some());
        assert!(report.message.contains("sync completed"));
    }

    #[test]
    fn flag_clears_between_sequential_runs() {
        let orch = orchestrator(seeded_store());
        orch.run(&SyncOptions::default()).expect("first run");
        assert!(!orch.is_running());
        orch.run(&SyncOptions::default()).expect("second run");
    }

    #[test]
    fn aborted_report_carries_single_error() {
        let report = SyncOrchestrator::aborted("stage table inconsistent".to_string());
        assert!(!report.success);
        assert_eq!(report.errors.len(), 1);
        assert!(report.stages.collection.is_none());
        assert!(report.message.starts_with("sync aborted"));
    }
}
