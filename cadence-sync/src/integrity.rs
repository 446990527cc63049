//! Integrity check stage.
//!
//! Three independent, additive passes over the transformed hierarchy:
//! 1. orphaned items (group id absent from the group set) — issue
//! 2. duplicate item ids — issue, deduplicated in the report
//! 3. empty groups — warning only, never an issue
//!
//! A group counts as non-empty when it holds items directly or through any
//! descendant group: a project group whose only content lives in its
//! sprint groups is not empty.
//!
//! Issues count toward run errors and flip `success`; warnings never do.

use std::collections::{BTreeMap, BTreeSet};

use cadence_core::types::{Group, GroupId, Item, ItemId};

use crate::result::IntegrityReport;

/// Run the integrity checks.
pub fn check(groups: &[Group], items: &[Item]) -> IntegrityReport {
    let group_ids: BTreeSet<&GroupId> = groups.iter().map(|g| &g.id).collect();
    let mut report = IntegrityReport::default();

    let orphans: Vec<&Item> = items
        .iter()
        .filter(|i| !group_ids.contains(&i.group_id))
        .collect();
    report.orphaned_item_count = orphans.len();
    if !orphans.is_empty() {
        let ids: Vec<String> = orphans.iter().map(|i| i.id.to_string()).collect();
        report.issues.push(format!(
            "{} orphaned item(s) referencing missing groups: {}",
            orphans.len(),
            ids.join(", ")
        ));
    }

    let mut counts: BTreeMap<&ItemId, usize> = BTreeMap::new();
    for item in items {
        *counts.entry(&item.id).or_default() += 1;
    }
    report.duplicate_ids = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id.clone())
        .collect();
    if !report.duplicate_ids.is_empty() {
        let ids: Vec<String> = report.duplicate_ids.iter().map(|i| i.to_string()).collect();
        report
            .issues
            .push(format!("duplicate item id(s): {}", ids.join(", ")));
    }

    let parents: BTreeMap<&GroupId, &GroupId> = groups
        .iter()
        .filter_map(|g| g.parent.as_ref().map(|p| (&g.id, p)))
        .collect();
    let mut populated: BTreeSet<&GroupId> = BTreeSet::new();
    for item in items {
        let mut current = Some(&item.group_id);
        while let Some(id) = current {
            if !populated.insert(id) {
                break;
            }
            current = parents.get(id).copied();
        }
    }
    for group in groups {
        if !populated.contains(&group.id) {
            report.warning_count += 1;
            report.warnings.push(format!("group {} has no items", group.id));
        }
    }

    if !report.issues.is_empty() {
        tracing::warn!("integrity check found {} issue(s)", report.issues.len());
    }
    report
}
