use serde::{Deserialize, Serialize};

/// How far along a task is for one day.
///
/// By the end of a day every primary task should ideally be passing:
/// `BeyondComplete`, `Complete` or `CompletionIrrelevant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    BeyondComplete,
    Complete,
    InProgressOrAttempted,
    Incomplete,
    CompletionIrrelevant,
}

impl TaskStatus {
    /// Passing statuses do not warrant a reminder.
    pub fn is_passing(self) -> bool {
        matches!(
            self,
            TaskStatus::BeyondComplete | TaskStatus::Complete | TaskStatus::CompletionIrrelevant
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::BeyondComplete => "beyond complete",
            TaskStatus::Complete => "complete",
            TaskStatus::InProgressOrAttempted => "in progress",
            TaskStatus::Incomplete => "incomplete",
            TaskStatus::CompletionIrrelevant => "-",
        }
    }
}
