//! Collaborator seams consumed by the sync pipeline.
//!
//! Everything behind these traits is out-of-scope infrastructure: a real
//! deployment wires in a persistence engine, a tree view, a cache, and a
//! notifier. The pipeline only sees these contracts and treats every
//! failure as data to record, never a reason to crash.

use crate::error::StoreError;
use crate::filter::{ProjectFilter, SprintFilter, TaskFilter};
use crate::types::{Group, Item, Project, Sprint, Task};

/// Read access to raw planning records.
///
/// Filters are hints; callers re-apply the rules after the fetch.
pub trait DataStore: Send + Sync {
    fn fetch_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, StoreError>;
    fn fetch_sprints(&self, filter: &SprintFilter) -> Result<Vec<Sprint>, StoreError>;
    fn fetch_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError>;
}

/// The tree/UI layer. The integration stage times this call.
pub trait ViewSink: Send + Sync {
    fn render(&self, groups: &[Group], items: &[Item]) -> Result<(), StoreError>;
}

/// Hierarchy cache. Returns whether the write took effect.
pub trait CacheStore: Send + Sync {
    fn write(&self, groups: &[Group], items: &[Item]) -> Result<bool, StoreError>;
}

/// Completion notifications. Returns the number actually dispatched.
pub trait NotificationChannel: Send + Sync {
    fn notify(&self, group_count: usize, item_count: usize) -> Result<usize, StoreError>;
}
