//! Options for one sync run.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use cadence_core::filter::{DateWindow, ProjectFilter};
use cadence_core::types::{TaskPriority, TaskStatus};

/// Caller-supplied knobs for a single [`run`](crate::orchestrator::SyncOrchestrator::run).
///
/// The default syncs every active record and excludes completed tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Project status / id restrictions.
    #[serde(default)]
    pub projects: ProjectFilter,
    /// Keep only sprints fully inside this window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_window: Option<DateWindow>,
    /// Include tasks in a completed status (`done`, `cancelled`).
    #[serde(default)]
    pub include_completed: bool,
    /// Keep only tasks in these statuses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_statuses: Option<BTreeSet<TaskStatus>>,
    /// Keep only tasks at these priorities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_priorities: Option<BTreeSet<TaskPriority>>,
}
