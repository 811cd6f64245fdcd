//! dailytasks-core: task catalog, completion rules and day-indexed persistence
//! for the daily habit tracker.

pub mod catalog;
pub mod controller;
pub mod day;
pub mod error;
pub mod reminders;
pub mod rule;
pub mod shared;
pub mod status;
pub mod store;
pub mod task;
pub mod value;

pub use catalog::{all_tasks, primary_tasks, CatalogIssue};
pub use controller::{DaySummary, TaskDataController};
pub use day::DayKey;
pub use error::{CoreError, Result};
pub use reminders::{
    evaluate_reminder, next_check_at, remaining_text, Reminder, ReminderDecision, ReminderPolicy,
};
pub use rule::{CompletionRule, ThresholdRule};
pub use shared::{global, init_global, SharedController};
pub use status::TaskStatus;
pub use store::{DayRecord, DayStore};
pub use task::{InputKind, Task, TaskDef};
pub use value::TaskValue;
