//! Per-stage outputs and the aggregate run report.
//!
//! One [`SyncReport`] is created empty at run start, filled stage by stage,
//! and handed to the caller by value — ownership freezes it once the run
//! finishes.

use serde::Serialize;

use cadence_core::types::{Group, Item, ItemId, Project, Sprint, Task};

/// Outcome of the collection stage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectionOutput {
    pub projects: Vec<Project>,
    pub sprints: Vec<Sprint>,
    pub tasks: Vec<Task>,
    /// One entry per failed sub-collector; the failed dimension is empty.
    pub errors: Vec<String>,
}

/// Outcome of the transformation stage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransformOutput {
    pub groups: Vec<Group>,
    pub items: Vec<Item>,
    /// Longest root-to-leaf chain in the derived hierarchy. 0 when empty.
    pub hierarchy_depth: usize,
    /// A mapping error aborts the stage: groups and items are empty.
    pub mapping_errors: Vec<String>,
}

/// Outcome of the integrity check stage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrityReport {
    pub orphaned_item_count: usize,
    /// Item ids seen more than once, deduplicated and sorted.
    pub duplicate_ids: Vec<ItemId>,
    /// Orphan and duplicate findings. Count toward run errors.
    pub issues: Vec<String>,
    pub warning_count: usize,
    /// Empty-group findings. Never count toward run errors.
    pub warnings: Vec<String>,
}

/// Outcome of the integration stage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrationOutput {
    pub view_update_ms: u128,
    pub notifications_sent: usize,
    pub cache_updated: bool,
    /// First failure stops the remaining sub-steps.
    pub errors: Vec<String>,
}

/// Stage outputs of one run. `None` means the stage never ran.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StageResults {
    pub collection: Option<CollectionOutput>,
    pub transformation: Option<TransformOutput>,
    pub validation: Option<IntegrityReport>,
    pub integration: Option<IntegrationOutput>,
}

/// Counters computed from stage outputs after the last stage.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SyncMetrics {
    pub total_projects: usize,
    pub total_sprints: usize,
    pub total_tasks: usize,
    pub total_groups: usize,
    pub total_items: usize,
    pub error_count: usize,
    pub warning_count: usize,
}

/// Aggregate result of one orchestrator run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// True iff `errors` is empty. Warnings never affect it.
    pub success: bool,
    /// One-line human summary.
    pub message: String,
    pub duration_ms: u128,
    pub stages: StageResults,
    pub metrics: SyncMetrics,
    /// Collection + mapping + integrity + integration failures, in stage order.
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_to_json() {
        let report = SyncReport {
            success: true,
            message: "sync completed: 2 group(s), 1 item(s)".to_string(),
            duration_ms: 12,
            ..SyncReport::default()
        };
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["success"], true);
        assert_eq!(json["duration_ms"], 12);
        assert!(json["stages"]["collection"].is_null());
    }
}
