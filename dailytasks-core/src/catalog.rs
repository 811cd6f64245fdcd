//! Catalog-wide queries over [`Task::ALL`].

use std::collections::HashSet;

use crate::error::Result;
use crate::task::{InputKind, Task};

pub fn all_tasks() -> &'static [Task] {
    &Task::ALL
}

/// Tasks that are nobody's sub-task, in declaration order.
pub fn primary_tasks() -> Vec<Task> {
    let nested: HashSet<Task> = Task::ALL
        .iter()
        .flat_map(|t| t.sub_tasks().iter().copied())
        .collect();
    Task::ALL
        .into_iter()
        .filter(|t| !nested.contains(t))
        .collect()
}

pub fn lookup(id: &str) -> Result<Task> {
    Task::from_id(id)
}

/// The task that lists `task` among its sub-tasks, if any.
pub fn parent_of(task: Task) -> Option<Task> {
    Task::ALL
        .into_iter()
        .find(|p| p.sub_tasks().contains(&task))
}

/// Problems with the shape of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    /// A task is reachable from itself through sub-tasks.
    Cycle(Task),
    /// A task is listed as a sub-task by more than one parent.
    SharedSubTask { task: Task, parents: Vec<Task> },
    /// A task without input has nothing to derive its status from.
    EmptyComposite(Task),
}

/// Checks that sub-tasks form a forest partitioning the catalog with the
/// primary tasks.
pub fn validate() -> std::result::Result<(), Vec<CatalogIssue>> {
    validate_tasks(&Task::ALL, |t| t.sub_tasks(), |t| t.input())
}

fn validate_tasks<F, G>(
    tasks: &[Task],
    subs: F,
    input: G,
) -> std::result::Result<(), Vec<CatalogIssue>>
where
    F: Fn(Task) -> &'static [Task],
    G: Fn(Task) -> InputKind,
{
    let mut issues = Vec::new();

    for &task in tasks {
        let parents: Vec<Task> = tasks
            .iter()
            .copied()
            .filter(|p| subs(*p).contains(&task))
            .collect();
        if parents.len() > 1 {
            issues.push(CatalogIssue::SharedSubTask { task, parents });
        }

        if input(task) == InputKind::None && subs(task).is_empty() {
            issues.push(CatalogIssue::EmptyComposite(task));
        }

        // Depth-first walk from the task's children; reaching the task again is a cycle.
        let mut seen = HashSet::new();
        let mut stack: Vec<Task> = subs(task).to_vec();
        while let Some(next) = stack.pop() {
            if next == task {
                issues.push(CatalogIssue::Cycle(task));
                break;
            }
            if seen.insert(next) {
                stack.extend_from_slice(subs(next));
            }
        }
    }

    if issues.is_empty() { Ok(()) } else { Err(issues) }
}
