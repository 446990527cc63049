//! Drives the sync pipeline as a black box through the verification engine.

use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread;

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use cadence_core::collab::{CacheStore, DataStore, NotificationChannel, ViewSink};
use cadence_core::error::StoreError;
use cadence_core::filter::{ProjectFilter, SprintFilter, TaskFilter};
use cadence_core::types::{Group, Item, Project, ProjectId, ProjectStatus, Sprint, SprintId, Task, TaskId};
use cadence_core::MemoryStore;
use cadence_sync::{SyncOptions, SyncOrchestrator};
use cadence_verify::{
    Check, CheckKind, HandlerMap, Scenario, ScenarioId, Step, StepContext, ValidationEngine,
};

struct NullView;
impl ViewSink for NullView {
    fn render(&self, _: &[Group], _: &[Item]) -> Result<(), StoreError> {
        Ok(())
    }
}

struct NullNotifier;
impl NotificationChannel for NullNotifier {
    fn notify(&self, groups: usize, items: usize) -> Result<usize, StoreError> {
        Ok(groups + items)
    }
}

struct NullCache;
impl CacheStore for NullCache {
    fn write(&self, _: &[Group], _: &[Item]) -> Result<bool, StoreError> {
        Ok(true)
    }
}

fn seeded_orchestrator() -> Arc<SyncOrchestrator> {
    let store = MemoryStore::new()
        .with_projects(vec![Project {
            id: ProjectId::from("P1"),
            name: "Copnow".to_string(),
            status: ProjectStatus::Active,
        }])
        .with_sprints(vec![Sprint {
            id: SprintId::from("S1"),
            project_id: ProjectId::from("P1"),
            name: "Sprint 1".to_string(),
            start_date: Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap(),
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
        }]);
    Arc::new(SyncOrchestrator::new(
        Arc::new(store),
        Arc::new(NullView),
        Arc::new(NullNotifier),
        Arc::new(NullCache),
    ))
}

/// `sync` action: run the pipeline, return the report as JSON.
fn sync_dispatcher(orch: Arc<SyncOrchestrator>) -> HandlerMap {
    let mut handlers = HandlerMap::new();
    handlers.register("sync", move |_: &Value, _: &StepContext| {
        let report = orch.run(&SyncOptions::default()).map_err(|e| e.to_string())?;
        serde_json::to_value(&report).map_err(|e| e.to_string())
    });
    handlers
}

fn check(kind: CheckKind, field: &str, expected: Value) -> Check {
    Check {
        kind,
        field: field.to_string(),
        expected,
        tolerance: None,
    }
}

#[test]
fn scenario_verifies_the_pipeline_end_to_end() {
    let orch = seeded_orchestrator();
    let mut engine = ValidationEngine::new();
    engine.register(Scenario {
        id: ScenarioId::from("pipeline_smoke"),
        category: Default::default(),
        description: "full sync produces the expected board".to_string(),
        preconditions: vec![],
        steps: vec![Step {
            action: "sync".to_string(),
            params: json!(null),
            checks: vec![
                check(CheckKind::Equals, "success", json!(true)),
                check(CheckKind::Count, "stages.transformation.groups", json!(2)),
                check(
                    CheckKind::Equals,
                    "stages.transformation.items[0].group_id",
                    json!("sprint-S1"),
                ),
                check(CheckKind::Equals, "metrics.total_items", json!(1)),
                check(CheckKind::Exists, "duration_ms", json!(null)),
                check(CheckKind::Contains, "message", json!("sync completed")),
            ],
        }],
        timeout_ms: Some(30_000),
        abort_on_failure: false,
    });

    let report = engine
        .run_scenario(
            &ScenarioId::from("pipeline_smoke"),
            &mut sync_dispatcher(orch),
        )
        .expect("run");
    assert!(report.success, "checks: {:#?}", report.steps[0].checks);
}

/// Holds a run in-flight so a scenario-driven run hits the busy guard.
struct GatedStore {
    entered: SyncSender<()>,
    release: Mutex<Receiver<()>>,
}

impl DataStore for GatedStore {
    fn fetch_projects(&self, _: &ProjectFilter) -> Result<Vec<Project>, StoreError> {
        self.entered.send(()).expect("signal entry");
        self.release
            .lock()
            .expect("release lock")
            .recv()
            .expect("wait for release");
        Ok(vec![])
    }
    fn fetch_sprints(&self, _: &SprintFilter) -> Result<Vec<Sprint>, StoreError> {
        Ok(vec![])
    }
    fn fetch_tasks(&self, _: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        Ok(vec![])
    }
}

#[test]
fn busy_rejection_is_a_step_failure_not_a_crash() {
    let (entered_tx, entered_rx) = sync_channel(1);
    let (release_tx, release_rx) = sync_channel(1);
    let orch = Arc::new(SyncOrchestrator::new(
        Arc::new(GatedStore {
            entered: entered_tx,
            release: Mutex::new(release_rx),
        }),
        Arc::new(NullView),
        Arc::new(NullNotifier),
        Arc::new(NullCache),
    ));

    let holder = {
        let orch = orch.clone();
        thread::spawn(move || orch.run(&SyncOptions::default()))
    };
    entered_rx.recv().expect("first run in flight");

    let mut engine = ValidationEngine::new();
    engine.register(Scenario {
        id: ScenarioId::from("busy_probe"),
        category: Default::default(),
        description: String::new(),
        preconditions: vec![],
        steps: vec![Step {
            action: "sync".to_string(),
            params: json!(null),
            checks: vec![],
        }],
        timeout_ms: None,
        abort_on_failure: false,
    });

    let report = engine
        .run_scenario(&ScenarioId::from("busy_probe"), &mut sync_dispatcher(orch))
        .expect("scenario executes");
    assert!(!report.success);
    assert_eq!(report.failed_steps, 1);
    assert!(
        report.steps[0]
            .error
            .as_deref()
            .expect("step error recorded")
            .contains("already in progress")
    );

    release_tx.send(()).expect("release first run");
    holder.join().expect("join").expect("first run completes");
}
