//! Transformation stage — raw records into the two-level board hierarchy.
//!
//! Group-id resolution for an item, in order:
//! 1. sprint group, when the task carries a sprint id
//! 2. project group, when the task carries a project id
//! 3. the `ungrouped` sentinel
//!
//! A resolved group that is absent from the group set reassigns the item to
//! `ungrouped`; the sentinel group is created lazily so such items are
//! never orphans.

use std::collections::{BTreeMap, BTreeSet};

use cadence_core::types::{Group, GroupId, Item, ItemId, Project, Sprint, Task, UNGROUPED};

use crate::result::TransformOutput;

/// Run the transformation stage.
///
/// A mapping error (duplicate group id) aborts the stage: the output
/// carries the single error and no partial group/item set.
pub fn run(projects: &[Project], sprints: &[Sprint], tasks: &[Task]) -> TransformOutput {
    match build(projects, sprints, tasks) {
        Ok((groups, items)) => {
            let hierarchy_depth = hierarchy_depth(&groups, &items);
            tracing::debug!(
                "built {} group(s), {} item(s), depth {hierarchy_depth}",
                groups.len(),
                items.len()
            );
            TransformOutput {
                groups,
                items,
                hierarchy_depth,
                mapping_errors: Vec::new(),
            }
        }
        Err(err) => {
            tracing::warn!("transformation aborted: {err}");
            TransformOutput {
                mapping_errors: vec![err],
                ..TransformOutput::default()
            }
        }
    }
}

fn build(
    projects: &[Project],
    sprints: &[Sprint],
    tasks: &[Task],
) -> Result<(Vec<Group>, Vec<Item>), String> {
    let mut groups: Vec<Group> = Vec::with_capacity(projects.len() + sprints.len() + 1);
    let mut known: BTreeSet<GroupId> = BTreeSet::new();

    let project_names: BTreeMap<&str, &str> = projects
        .iter()
        .map(|p| (p.id.0.as_str(), p.name.as_str()))
        .collect();

    for project in projects {
        let id = GroupId::for_project(&project.id);
        if !known.insert(id.clone()) {
            return Err(format!("duplicate group id {id}"));
        }
        groups.push(Group {
            id,
            label: project.name.clone(),
            description: format!("Project {}", project.name),
            parent: None,
        });
    }

    for sprint in sprints {
        let id = GroupId::for_sprint(&sprint.id);
        if !known.insert(id.clone()) {
            return Err(format!("duplicate group id {id}"));
        }
        // The sprint group carries its owning project's name; a sprint fed
        // in without its project still gets a group, just unparented.
        let owner = project_names.get(sprint.project_id.0.as_str()).copied();
        groups.push(Group {
            id,
            label: sprint.name.clone(),
            description: match owner {
                Some(name) => format!("Sprint of {name}"),
                None => "Sprint".to_string(),
            },
            parent: owner.map(|_| GroupId::for_project(&sprint.project_id)),
        });
    }

    let mut items: Vec<Item> = Vec::with_capacity(tasks.len());
    for task in tasks {
        let resolved = if let Some(sprint_id) = &task.sprint_id {
            GroupId::for_sprint(sprint_id)
        } else if let Some(project_id) = &task.project_id {
            GroupId::for_project(project_id)
        } else {
            GroupId::ungrouped()
        };
        let group_id = if resolved.0 == UNGROUPED || known.contains(&resolved) {
            resolved
        } else {
            GroupId::ungrouped()
        };
        if group_id.0 == UNGROUPED && !known.contains(&group_id) {
            known.insert(group_id.clone());
            groups.push(Group {
                id: group_id.clone(),
                label: "Ungrouped".to_string(),
                description: "Tasks without a resolvable group".to_string(),
                parent: None,
            });
        }
        items.push(Item {
            id: ItemId::from(task.id.0.clone()),
            title: task.title.clone(),
            completed: task.status.is_completed(),
            group_id,
            description: task.description.clone(),
            due_date: task.due_date,
            tags: task.tags.clone(),
        });
    }

    Ok((groups, items))
}

/// Longest root-to-leaf chain: group parent chains, plus the item level
/// when any items exist. An empty forest has depth 0.
fn hierarchy_depth(groups: &[Group], items: &[Item]) -> usize {
    if groups.is_empty() {
        return 0;
    }
    let by_id: BTreeMap<&GroupId, &Group> = groups.iter().map(|g| (&g.id, g)).collect();
    let mut deepest = 0;
    for group in groups {
        deepest = deepest.max(chain_len(group, &by_id));
    }
    if items.is_empty() {
        deepest
    } else {
        deepest + 1
    }
}

fn chain_len(group: &Group, by_id: &BTreeMap<&GroupId, &Group>) -> usize {
    let mut len = 1;
    let mut current = group;
    while let Some(parent_id) = &current.parent {
        let Some(parent) = by_id.get(parent_id) else {
            break;
        };
        len += 1;
        current = *parent;
        if len > by_id.len() {
            // Cycle in parent references; stop rather than spin.
            break;
        }
    }
    len
}
