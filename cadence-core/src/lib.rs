//! Cadence core library — domain types, collaborator seams, reference store.
//!
//! Public API surface:
//! - [`types`] — newtypes, raw records, the derived `Group`/`Item` hierarchy
//! - [`filter`] — fetch filters with authoritative `matches()` predicates
//! - [`collab`] — the four collaborator traits the pipeline depends on
//! - [`error`] — [`StoreError`]
//! - [`store`] — [`MemoryStore`], the in-memory reference `DataStore`
//! - [`workspace`] — YAML fixture file load / save

pub mod collab;
pub mod error;
pub mod filter;
pub mod store;
pub mod types;
pub mod workspace;

pub use collab::{CacheStore, DataStore, NotificationChannel, ViewSink};
pub use error::StoreError;
pub use filter::{DateWindow, ProjectFilter, SprintFilter, TaskFilter};
pub use store::MemoryStore;
pub use types::{
    Group, GroupId, Item, ItemId, Project, ProjectId, ProjectStatus, Sprint, SprintId, Task,
    TaskId, TaskPriority, TaskStatus, UNGROUPED,
};
