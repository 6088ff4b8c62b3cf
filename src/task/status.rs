//! Task lifecycle status.
//!
//! A status always travels as its canonical lowercase string, both in JSON
//! and in query strings. Parsing is lenient about case and surrounding
//! whitespace, rendering is not.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a task.
///
/// The store imposes no transition rules: any status may be replaced by any
/// other through an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TaskStatus {
    /// Not started yet
    #[default]
    Todo,
    /// Work in progress
    Doing,
    /// Finished
    Done,
}

/// Error returned when a string is not one of the canonical status forms.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0:?} is not a valid task status")]
pub struct ParseTaskStatusError(pub String);

impl TaskStatus {
    /// All variants, in lifecycle order.
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::Doing, Self::Done];

    /// Canonical wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseTaskStatusError(normalized))
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}
