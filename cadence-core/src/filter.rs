//! Record filters passed to [`DataStore`](crate::collab::DataStore) fetches.
//!
//! A filter handed to a store is a hint — a backing store may use it to
//! narrow a query, or ignore it entirely. The collection stage re-applies
//! every rule through `matches()` after the fetch, so filtering stays
//! correct either way.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    Project, ProjectId, ProjectStatus, Sprint, SprintId, Task, TaskPriority, TaskStatus,
};

/// An inclusive date window. Sprints are kept only when they lie entirely
/// inside the window: a sprint is excluded if its end is after `end` or its
/// start is before `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    pub fn contains_sprint(&self, sprint: &Sprint) -> bool {
        !(sprint.end_date > self.end || sprint.start_date < self.start)
    }
}

/// Filter for project fetches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFilter {
    /// Keep only projects whose status is in the set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<BTreeSet<ProjectStatus>>,
    /// Keep only projects with these exact ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<BTreeSet<ProjectId>>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&project.status) {
                return false;
            }
        }
        if let Some(ids) = &self.ids {
            if !ids.contains(&project.id) {
                return false;
            }
        }
        true
    }
}

/// Filter for sprint fetches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintFilter {
    /// Keep only sprints belonging to these projects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_ids: Option<BTreeSet<ProjectId>>,
    /// Keep only sprints fully inside the window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<DateWindow>,
}

impl SprintFilter {
    pub fn matches(&self, sprint: &Sprint) -> bool {
        if let Some(project_ids) = &self.project_ids {
            if !project_ids.contains(&sprint.project_id) {
                return false;
            }
        }
        if let Some(window) = &self.window {
            if !window.contains_sprint(sprint) {
                return false;
            }
        }
        true
    }
}

/// Filter for task fetches.
///
/// A task with no project (or sprint) reference is valid for that dimension:
/// the id-set restrictions only apply when the task actually carries the
/// reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_ids: Option<BTreeSet<ProjectId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_ids: Option<BTreeSet<SprintId>>,
    /// When false (the default), tasks in a completed status are excluded.
    #[serde(default)]
    pub include_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<BTreeSet<TaskStatus>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priorities: Option<BTreeSet<TaskPriority>>,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            project_ids: None,
            sprint_ids: None,
            include_completed: false,
            statuses: None,
            priorities: None,
        }
    }
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let (Some(project_ids), Some(project_id)) = (&self.project_ids, &task.project_id) {
            if !project_ids.contains(project_id) {
                return false;
            }
        }
        if let (Some(sprint_ids), Some(sprint_id)) = (&self.sprint_ids, &task.sprint_id) {
            if !sprint_ids.contains(sprint_id) {
                return false;
            }
        }
        if !self.include_completed && task.status.is_completed() {
            return false;
        }
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&task.status) {
                return false;
            }
        }
        if let Some(priorities) = &self.priorities {
            if !priorities.contains(&task.priority) {
                return false;
            }
        }
        true
    }
}
