//! Error type shared by the whole core.

use std::path::PathBuf;

use thiserror::Error;

use crate::day::DayKey;

#[derive(Error, Debug)]
pub enum CoreError {
    /// The data file exists but does not match the day-record schema.
    #[error("malformed task data file {}: {source}", .path.display())]
    MalformedStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("task data file {} holds more than one record for {date}", .path.display())]
    DuplicateDay { path: PathBuf, date: DayKey },

    #[error("unknown task id: {0}")]
    UnknownTask(String),

    #[error("invalid value {value} for task {task}: values must be non-negative and fit in 32 bits")]
    InvalidValue { task: String, value: i64 },

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("i/o failure on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("task data lock poisoned by a panicking holder")]
    LockPoisoned,
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the caller's input rather than by storage.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CoreError::UnknownTask(_) | CoreError::InvalidValue { .. } | CoreError::InvalidDate(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
