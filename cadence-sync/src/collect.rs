//! Collection stage — pulls raw records from the data store.
//!
//! Three sub-collectors run in sequence: projects, sprints, tasks. Each
//! catches its own store failure, substitutes an empty list, and appends
//! one error entry, so one failed dimension never takes down the others.
//! Sprints are restricted to the projects actually collected; tasks to the
//! projects and sprints actually collected.

use std::collections::BTreeSet;

use cadence_core::collab::DataStore;
use cadence_core::filter::{SprintFilter, TaskFilter};
use cadence_core::types::{ProjectId, SprintId};

use crate::options::SyncOptions;
use crate::result::CollectionOutput;

/// Run the collection stage.
pub fn run(store: &dyn DataStore, options: &SyncOptions) -> CollectionOutput {
    let mut out = CollectionOutput::default();

    match store.fetch_projects(&options.projects) {
        Ok(projects) => {
            out.projects = projects
                .into_iter()
                .filter(|p| options.projects.matches(p))
                .collect();
        }
        Err(err) => {
            tracing::warn!("project collection failed: {err}");
            out.errors.push(format!("project collection failed: {err}"));
        }
    }

    let project_ids: BTreeSet<ProjectId> = out.projects.iter().map(|p| p.id.clone()).collect();
    let sprint_filter = SprintFilter {
        project_ids: Some(project_ids.clone()),
        window: options.sprint_window,
    };
    match store.fetch_sprints(&sprint_filter) {
        Ok(sprints) => {
            out.sprints = sprints
                .into_iter()
                .filter(|s| sprint_filter.matches(s))
                .collect();
        }
        Err(err) => {
            tracing::warn!("sprint collection failed: {err}");
            out.errors.push(format!("sprint collection failed: {err}"));
        }
    }

    let sprint_ids: BTreeSet<SprintId> = out.sprints.iter().map(|s| s.id.clone()).collect();
    let task_filter = TaskFilter {
        project_ids: Some(project_ids),
        sprint_ids: Some(sprint_ids),
        include_completed: options.include_completed,
        statuses: options.task_statuses.clone(),
        priorities: options.task_priorities.clone(),
    };
    match store.fetch_tasks(&task_filter) {
        Ok(tasks) => {
            out.tasks = tasks.into_iter().filter(|t| task_filter.matches(t)).collect();
        }
        Err(err) => {
            tracing::warn!("task collection failed: {err}");
            out.errors.push(format!("task collection failed: {err}"));
        }
    }

    tracing::debug!(
        "collected {} project(s), {} sprint(s), {} task(s)",
        out.projects.len(),
        out.sprints.len(),
        out.tasks.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::error::StoreError;
    use cadence_core::filter::{DateWindow, ProjectFilter};
    use cadence_core::types::{
        Project, ProjectStatus, Sprint, Task, TaskId, TaskPriority, TaskStatus,
    };
    use cadence_core::MemoryStore;
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, d, 0, 0, 0).unwrap()
    }

    fn project(id: &str) -> Project {
        Project {
            id: ProjectId::from(id),
            name: id.to_string(),
            status: ProjectStatus::Active,
        }
    }

    fn sprint(id: &str, project: &str, start: u32, end: u32) -> Sprint {
        Sprint {
            id: SprintId::from(id),
            project_id: ProjectId::from(project),
            name: id.to_string(),
            start_date: day(start),
            end_date: day(end),
        }
    }

    fn task(id: &str, project: Option<&str>, sprint: Option<&str>) -> Task {
        Task {
            id: TaskId::from(id),
            project_id: project.map(ProjectId::from),
            sprint_id: sprint.map(SprintId::from),
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            title: id.to_string(),
            description: None,
            due_date: None,
            tags: vec![],
        }
    }

    /// A store that fails every fetch.
    struct DownStore;

    impl DataStore for DownStore {
        fn fetch_projects(&self, _: &ProjectFilter) -> Result<Vec<Project>, StoreError> {
            Err(StoreError::unavailable("projects offline"))
        }
        fn fetch_sprints(&self, _: &SprintFilter) -> Result<Vec<Sprint>, StoreError> {
            Err(StoreError::unavailable("sprints offline"))
        }
        fn fetch_tasks(&self, _: &TaskFilter) -> Result<Vec<Task>, StoreError> {
            Err(StoreError::unavailable("tasks offline"))
        }
    }

    #[test]
    fn all_sub_collectors_fail_independently() {
        let out = run(&DownStore, &SyncOptions::default());
        assert!(out.projects.is_empty());
        assert!(out.sprints.is_empty());
        assert!(out.tasks.is_empty());
        assert_eq!(out.errors.len(), 3, "one error per sub-collector");
        assert!(out.errors[0].contains("project collection failed"));
        assert!(out.errors[1].contains("sprint collection failed"));
        assert!(out.errors[2].contains("task collection failed"));
    }

    #[test]
    fn sprints_restricted_to_collected_projects() {
        let store = MemoryStore::new()
            .with_projects(vec![project("P1")])
            .with_sprints(vec![sprint("S1", "P1", 1, 5), sprint("S2", "P9", 1, 5)]);
        let out = run(&store, &SyncOptions::default());
        assert_eq!(out.sprints.len(), 1);
        assert_eq!(out.sprints[0].id.0, "S1");
    }

    #[test]
    fn sprint_window_excludes_out_of_range() {
        let store = MemoryStore::new()
            .with_projects(vec![project("P1")])
            .with_sprints(vec![
                sprint("inside", "P1", 5, 10),
                sprint("too_early", "P1", 1, 10),
                sprint("too_late", "P1", 5, 25),
            ]);
        let options = SyncOptions {
            sprint_window: Some(DateWindow {
                start: day(2),
                end: day(20),
            }),
            ..SyncOptions::default()
        };
        let out = run(&store, &options);
        assert_eq!(out.sprints.len(), 1);
        assert_eq!(out.sprints[0].id.0, "inside");
    }

    #[test]
    fn tasks_restricted_to_collected_scope_but_unreferenced_are_kept() {
        let store = MemoryStore::new()
            .with_projects(vec![project("P1")])
            .with_sprints(vec![sprint("S1", "P1", 1, 5)])
            .with_tasks(vec![
                task("in_sprint", Some("P1"), Some("S1")),
                task("foreign_project", Some("P9"), None),
                task("floating", None, None),
            ]);
        let out = run(&store, &SyncOptions::default());
        let ids: Vec<&str> = out.tasks.iter().map(|t| t.id.0.as_str()).collect();
        assert_eq!(ids, vec!["in_sprint", "floating"]);
    }

    #[test]
    fn status_and_priority_filters_compose() {
        let mut high = task("high", None, None);
        high.priority = TaskPriority::High;
        let mut blocked = task("blocked", None, None);
        blocked.status = TaskStatus::Blocked;
        let store = MemoryStore::new().with_tasks(vec![high, blocked]);

        let options = SyncOptions {
            task_statuses: Some([TaskStatus::Todo].into()),
            task_priorities: Some([TaskPriority::High].into()),
            ..SyncOptions::default()
        };
        let out = run(&store, &options);
        assert_eq!(out.tasks.len(), 1);
        assert_eq!(out.tasks[0].id.0, "high");
    }

    #[test]
    fn failed_project_collection_starves_downstream_dimensions() {
        /// Projects fail; sprints and tasks are served.
        struct PartialStore;

        impl DataStore for PartialStore {
            fn fetch_projects(&self, _: &ProjectFilter) -> Result<Vec<Project>, StoreError> {
                Err(StoreError::unavailable("projects offline"))
            }
            fn fetch_sprints(&self, filter: &SprintFilter) -> Result<Vec<Sprint>, StoreError> {
                Ok(vec![sprint("S1", "P1", 1, 5)]
                    .into_iter()
                    .filter(|s| filter.matches(s))
                    .collect())
            }
            fn fetch_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
                Ok(vec![task("floating", None, None)]
                    .into_iter()
                    .filter(|t| filter.matches(t))
                    .collect())
            }
        }

        let out = run(&PartialStore, &SyncOptions::default());
        assert_eq!(out.errors.len(), 1);
        assert!(out.sprints.is_empty(), "no collected projects, no sprints");
        assert_eq!(out.tasks.len(), 1, "unreferenced tasks survive");
    }
}
