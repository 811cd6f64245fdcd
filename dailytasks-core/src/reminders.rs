//! Reminder decisions for the notification layer.
//!
//! Delivery (channels, alarms) belongs to the host; this module only decides
//! whether a reminder is warranted, what it says, and when to look again.

use chrono::{DateTime, Duration, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::controller::TaskDataController;
use crate::day::DayKey;
use crate::task::Task;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPolicy {
    /// Hours between checks, counted from the top of the current hour.
    pub interval_hours: u32,
    pub title: String,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            interval_hours: 3,
            title: "Daily Tasks".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub title: String,
    pub body: String,
    pub pending: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderDecision {
    Notify(Reminder),
    /// Nothing left to do: any outstanding reminder should be withdrawn.
    Clear,
}

pub fn remaining_text(count: usize) -> String {
    if count == 1 {
        "1 task remaining".to_string()
    } else {
        format!("{count} tasks remaining")
    }
}

/// Reminder for `date`: one entry per primary task that is not passing.
pub fn evaluate_reminder(
    controller: &TaskDataController,
    date: DayKey,
    policy: &ReminderPolicy,
) -> ReminderDecision {
    let pending = controller.pending_tasks(date);
    if pending.is_empty() {
        return ReminderDecision::Clear;
    }
    ReminderDecision::Notify(Reminder {
        title: policy.title.clone(),
        body: remaining_text(pending.len()),
        pending,
    })
}

/// Top of the current hour plus the policy interval (at least one hour).
///
/// `None` when that instant falls outside the representable calendar.
pub fn next_check_at<Tz: TimeZone>(
    now: &DateTime<Tz>,
    policy: &ReminderPolicy,
) -> Option<DateTime<Tz>> {
    let into_hour = Duration::seconds(i64::from(now.minute() * 60 + now.second()))
        + Duration::nanoseconds(i64::from(now.nanosecond()));
    now.clone()
        .checked_sub_signed(into_hour)?
        .checked_add_signed(Duration::hours(i64::from(policy.interval_hours.max(1))))
}
