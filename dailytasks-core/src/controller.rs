//! TaskDataController: the surface the presentation and notification layers use.
//!
//! Every query takes the day explicitly; which day a screen is showing is the
//! caller's business.

use std::path::PathBuf;

use crate::catalog;
use crate::day::DayKey;
use crate::error::Result;
use crate::status::TaskStatus;
use crate::store::{DayRecord, DayStore};
use crate::task::Task;
use crate::value::TaskValue;

/// How many primary tasks are passing on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySummary {
    pub date: DayKey,
    pub passing: usize,
    pub total: usize,
}

impl DaySummary {
    pub fn all_passing(&self) -> bool {
        self.passing == self.total
    }
}

#[derive(Debug)]
pub struct TaskDataController {
    store: DayStore,
}

impl TaskDataController {
    pub fn new(store: DayStore) -> Self {
        Self { store }
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(DayStore::open(path)?))
    }

    pub fn store(&self) -> &DayStore {
        &self.store
    }

    pub fn primary_tasks(&self) -> Vec<Task> {
        catalog::primary_tasks()
    }

    /// See [`DayStore::record_for`]: creates and persists the record if missing.
    pub fn record_for(&mut self, date: DayKey) -> Result<&DayRecord> {
        self.store.record_for(date)
    }

    pub fn value_of(&self, task: Task, date: DayKey) -> u32 {
        self.store.get_value(date, task.id())
    }

    /// `task`'s value on `date` with its sub-tasks' values nested below it.
    pub fn value_tree_for(&self, task: Task, date: DayKey) -> TaskValue {
        TaskValue::new(
            self.value_of(task, date),
            task.sub_tasks()
                .iter()
                .map(|sub| self.value_tree_for(*sub, date))
                .collect(),
        )
    }

    /// Records `value` for `task` on `date`.
    ///
    /// Negative values are rejected. Checkbox tasks accept any positive value
    /// and read it as checked.
    pub fn set_value(&mut self, task: Task, value: i64, date: DayKey) -> Result<()> {
        self.store.set_value(date, task.id(), value)
    }

    pub fn status_of(&self, task: Task, date: DayKey) -> TaskStatus {
        task.evaluate(&self.value_tree_for(task, date))
    }

    /// Primary tasks that still warrant attention on `date`.
    pub fn pending_tasks(&self, date: DayKey) -> Vec<Task> {
        self.primary_tasks()
            .into_iter()
            .filter(|t| !self.status_of(*t, date).is_passing())
            .collect()
    }

    pub fn summary_for(&self, date: DayKey) -> DaySummary {
        let primary = self.primary_tasks();
        let passing = primary
            .iter()
            .filter(|t| self.status_of(**t, date).is_passing())
            .count();
        DaySummary {
            date,
            passing,
            total: primary.len(),
        }
    }

    /// Drops empty day records other than `keep`.
    pub fn prune(&mut self, keep: Option<DayKey>) -> Result<usize> {
        self.store.prune(keep)
    }
}
