//! Plain-text rendering of tasks and statuses.

use dailytasks_core::{DayKey, InputKind, Task, TaskDataController, TaskStatus};

fn marker(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::BeyondComplete => "[++]",
        TaskStatus::Complete => "[x]",
        TaskStatus::InProgressOrAttempted => "[~]",
        TaskStatus::Incomplete => "[ ]",
        TaskStatus::CompletionIrrelevant => "[-]",
    }
}

fn value_text(task: Task, value: u32) -> String {
    match task.input() {
        InputKind::Checkbox => if value > 0 { "done" } else { "not done" }.to_string(),
        InputKind::PositiveInteger => format!("{} {}", value, task.unit()).trim_end().to_string(),
        InputKind::None => String::new(),
    }
}

/// One line for `task`, then its sub-tasks indented below.
pub fn task_lines(c: &TaskDataController, task: Task, date: DayKey, depth: usize) -> Vec<String> {
    let status = c.status_of(task, date);
    let value = value_text(task, c.value_of(task, date));
    let indent = "  ".repeat(depth);

    let mut line = format!("{indent}{} {}", marker(status), task.display_name());
    if !value.is_empty() {
        line.push_str(&format!(" ({value})"));
    }
    line.push_str(&format!(" - {}", status.label()));

    let mut out = vec![line];
    for sub in task.sub_tasks() {
        out.extend(task_lines(c, *sub, date, depth + 1));
    }
    out
}

pub fn catalog_lines() -> Vec<String> {
    fn walk(task: Task, depth: usize, out: &mut Vec<String>) {
        let kind = match task.input() {
            InputKind::Checkbox => "checkbox".to_string(),
            InputKind::PositiveInteger => format!("count of {}", task.unit()),
            InputKind::None => "from sub-tasks".to_string(),
        };
        out.push(format!(
            "{}{:<18} {} [{}]",
            "  ".repeat(depth),
            task.id(),
            task.display_name(),
            kind
        ));
        out.push(format!("{}    {}", "  ".repeat(depth), task.description()));
        for sub in task.sub_tasks() {
            walk(*sub, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    for task in dailytasks_core::primary_tasks() {
        walk(task, 0, &mut out);
    }
    out
}
