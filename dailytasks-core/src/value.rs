//! Value trees handed to completion rules.

/// A task's recorded value for one day together with the values of its
/// sub-tasks, in the order the sub-tasks are declared.
///
/// Built fresh on every query; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskValue {
    pub value: u32,
    pub sub_task_values: Vec<TaskValue>,
}

impl TaskValue {
    pub fn leaf(value: u32) -> Self {
        Self {
            value,
            sub_task_values: Vec::new(),
        }
    }

    pub fn new(value: u32, sub_task_values: Vec<TaskValue>) -> Self {
        Self {
            value,
            sub_task_values,
        }
    }

    /// Raw value of the sub-task at `index`; a missing sub-task reads as 0.
    pub fn sub_value(&self, index: usize) -> u32 {
        self.sub_task_values
            .get(index)
            .map(|v| v.value)
            .unwrap_or(0)
    }

    /// Follow `path` down the tree, one sub-task index per level.
    pub fn at(&self, path: &[usize]) -> Option<&TaskValue> {
        path.iter()
            .try_fold(self, |node, &i| node.sub_task_values.get(i))
    }

    /// Checkbox reading of the value.
    pub fn is_checked(&self) -> bool {
        self.value > 0
    }
}
