//! The compiled-in task catalog.
//!
//! A task's persisted id (`Task::id`) is the key its values are recorded under
//! in the data file, so it must never change once data exists for it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::rule::{eat_rule, CompletionRule, ThresholdRule};
use crate::status::TaskStatus;
use crate::value::TaskValue;

/// How the user records a value for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    /// 0 or 1.
    Checkbox,
    /// 0, 1, 2, ...
    PositiveInteger,
    /// No direct input; status comes from sub-tasks.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Task {
    Meditate,
    Shower,
    BrushTeeth,
    PracticeMusic,
    EatHealthy,
    EatMiscellaneous,
    Eat,
    Exercise,
    CommitCode,
    LearnScience,
    LearnLanguage,
    BeSocial,
    Journal,
}

/// Static definition of a task.
#[derive(Debug, Clone, Copy)]
pub struct TaskDef {
    pub display_name: &'static str,
    pub description: &'static str,
    pub input: InputKind,
    /// Units of the recorded value (minutes, times, meals); empty for checkboxes.
    pub unit: &'static str,
    pub rule: CompletionRule,
    pub sub_tasks: &'static [Task],
}

impl TaskDef {
    const fn checkbox(display_name: &'static str, description: &'static str) -> Self {
        Self {
            display_name,
            description,
            input: InputKind::Checkbox,
            unit: "",
            rule: CompletionRule::Threshold(ThresholdRule::checkbox()),
            sub_tasks: &[],
        }
    }

    const fn counted(
        display_name: &'static str,
        description: &'static str,
        unit: &'static str,
        rule: ThresholdRule,
    ) -> Self {
        Self {
            display_name,
            description,
            input: InputKind::PositiveInteger,
            unit,
            rule: CompletionRule::Threshold(rule),
            sub_tasks: &[],
        }
    }
}

static MEDITATE: TaskDef = TaskDef::counted(
    "Meditate",
    "Meditate for at least 5 minutes. Do not do this at the expense of sleep.",
    "minutes",
    ThresholdRule::new(Some(15), Some(5), None, TaskStatus::Incomplete),
);
static SHOWER: TaskDef = TaskDef::checkbox("Shower", "Take a shower.");
static BRUSH_TEETH: TaskDef = TaskDef::counted(
    "Brush Teeth",
    "Brush your teeth at least twice.",
    "times",
    ThresholdRule::new(None, Some(2), Some(1), TaskStatus::Incomplete),
);
static PRACTICE_MUSIC: TaskDef = TaskDef::counted(
    "Practice Music",
    "Spend at least 30 minutes practicing piano, cello, and/or music composition.",
    "minutes",
    ThresholdRule::new(Some(60), Some(30), Some(1), TaskStatus::Incomplete),
);
static EAT_HEALTHY: TaskDef = TaskDef::counted(
    "Eat Healthy Meals",
    "Eat healthy meals.",
    "meals",
    ThresholdRule::new(Some(2), Some(1), None, TaskStatus::Incomplete),
);
static EAT_MISCELLANEOUS: TaskDef = TaskDef::counted(
    "Eat Meals",
    "Eat meals.",
    "meals",
    ThresholdRule::irrelevant(),
);
static EAT: TaskDef = TaskDef {
    display_name: "Eat",
    description: "Eat at least two meals today. At least one of those meals needs to be healthy.",
    input: InputKind::None,
    unit: "",
    rule: CompletionRule::Composite(eat_rule),
    sub_tasks: &[Task::EatHealthy, Task::EatMiscellaneous],
};
static EXERCISE: TaskDef = TaskDef::counted(
    "Exercise",
    "Exercise for at least 30 minutes.",
    "minutes",
    ThresholdRule::new(Some(60), Some(30), Some(1), TaskStatus::Incomplete),
);
static COMMIT_CODE: TaskDef = TaskDef::checkbox(
    "Commit Code",
    "Commit a change on a git repository. Professional work does not count.",
);
static LEARN_SCIENCE: TaskDef = TaskDef::checkbox(
    "Learn New Science",
    "Learn some new science that you didn't know before.",
);
static LEARN_LANGUAGE: TaskDef = TaskDef::checkbox(
    "Learn More Language",
    "Learn more of a language that you don't speak natively.",
);
static BE_SOCIAL: TaskDef = TaskDef::checkbox(
    "Be Social",
    "Engage in some sort of social activity or perform some sort of social behaviour.",
);
static JOURNAL: TaskDef = TaskDef::checkbox(
    "Write in Journal",
    "Write about your day in your journal. Think a little bit about what has happened today and what you have done or not done.",
);

impl Task {
    /// Every task, in declaration order.
    pub const ALL: [Task; 13] = [
        Task::Meditate,
        Task::Shower,
        Task::BrushTeeth,
        Task::PracticeMusic,
        Task::EatHealthy,
        Task::EatMiscellaneous,
        Task::Eat,
        Task::Exercise,
        Task::CommitCode,
        Task::LearnScience,
        Task::LearnLanguage,
        Task::BeSocial,
        Task::Journal,
    ];

    pub fn definition(self) -> &'static TaskDef {
        match self {
            Task::Meditate => &MEDITATE,
            Task::Shower => &SHOWER,
            Task::BrushTeeth => &BRUSH_TEETH,
            Task::PracticeMusic => &PRACTICE_MUSIC,
            Task::EatHealthy => &EAT_HEALTHY,
            Task::EatMiscellaneous => &EAT_MISCELLANEOUS,
            Task::Eat => &EAT,
            Task::Exercise => &EXERCISE,
            Task::CommitCode => &COMMIT_CODE,
            Task::LearnScience => &LEARN_SCIENCE,
            Task::LearnLanguage => &LEARN_LANGUAGE,
            Task::BeSocial => &BE_SOCIAL,
            Task::Journal => &JOURNAL,
        }
    }

    /// Persisted identifier.
    pub fn id(self) -> &'static str {
        match self {
            Task::Meditate => "MEDITATE",
            Task::Shower => "SHOWER",
            Task::BrushTeeth => "BRUSH_TEETH",
            Task::PracticeMusic => "PRACTICE_MUSIC",
            Task::EatHealthy => "EAT_HEALTHY",
            Task::EatMiscellaneous => "EAT_MISCELLANEOUS",
            Task::Eat => "EAT",
            Task::Exercise => "EXERCISE",
            Task::CommitCode => "COMMIT_CODE",
            Task::LearnScience => "LEARN_SCIENCE",
            Task::LearnLanguage => "LEARN_LANGUAGE",
            Task::BeSocial => "BE_SOCIAL",
            Task::Journal => "JOURNAL",
        }
    }

    /// Looks a task up by its persisted id.
    pub fn from_id(id: &str) -> Result<Task, CoreError> {
        Task::ALL
            .into_iter()
            .find(|t| t.id() == id)
            .ok_or_else(|| CoreError::UnknownTask(id.to_string()))
    }

    pub fn display_name(self) -> &'static str {
        self.definition().display_name
    }

    pub fn description(self) -> &'static str {
        self.definition().description
    }

    pub fn input(self) -> InputKind {
        self.definition().input
    }

    pub fn unit(self) -> &'static str {
        self.definition().unit
    }

    pub fn sub_tasks(self) -> &'static [Task] {
        self.definition().sub_tasks
    }

    pub fn evaluate(self, value: &TaskValue) -> TaskStatus {
        self.definition().rule.evaluate(value)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Accepts the persisted id in any letter case, with `-` standing in for `_`.
impl FromStr for Task {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Task::from_id(&normalized).map_err(|_| CoreError::UnknownTask(s.to_string()))
    }
}
