//! In-memory reference [`DataStore`].
//!
//! Backs tests, demos, and the workspace fixture file. Fetches apply the
//! filter hints so the store behaves like a real narrowing backend.

use crate::collab::DataStore;
use crate::error::StoreError;
use crate::filter::{ProjectFilter, SprintFilter, TaskFilter};
use crate::types::{Project, Sprint, Task};
use crate::workspace::WorkspaceFile;

/// A plain in-memory record store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    projects: Vec<Project>,
    sprints: Vec<Sprint>,
    tasks: Vec<Task>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a loaded workspace fixture.
    pub fn from_workspace(workspace: WorkspaceFile) -> Self {
        Self {
            projects: workspace.projects,
            sprints: workspace.sprints,
            tasks: workspace.tasks,
        }
    }

    pub fn with_projects(mut self, projects: Vec<Project>) -> Self {
        self.projects = projects;
        self
    }

    pub fn with_sprints(mut self, sprints: Vec<Sprint>) -> Self {
        self.sprints = sprints;
        self
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }
}

impl DataStore for MemoryStore {
    fn fetch_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, StoreError> {
        Ok(self
            .projects
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    fn fetch_sprints(&self, filter: &SprintFilter) -> Result<Vec<Sprint>, StoreError> {
        Ok(self
            .sprints
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }

    fn fetch_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }
}
