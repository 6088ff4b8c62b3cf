//! Task record, create candidates and partial updates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::status::TaskStatus;

/// Task identifier. Assigned by the store, never by clients.
pub type TaskId = u64;

/// Textual form every due date must use.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised by task store operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task not found")]
    NotFound(TaskId),

    #[error("Invalid due date (format: YYYY-MM-DD)")]
    InvalidDueDate(String),
}

/// A tracked task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    /// Free-form grouping key, matched exactly when filtering
    pub category: String,
    /// Always `YYYY-MM-DD`, so string order is date order
    pub due_date: String,
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    pub fn new(
        id: TaskId,
        name: impl Into<String>,
        category: impl Into<String>,
        due_date: impl Into<String>,
        status: TaskStatus,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            due_date: due_date.into(),
            status,
        }
    }
}

/// Payload for creating a task. Any `id` sent by the client is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub name: String,
    pub category: String,
    pub due_date: String,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

impl NewTask {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            due_date: due_date.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn validate(&self) -> Result<(), TaskError> {
        validate_due_date(&self.due_date)
    }

    /// Build the stored task. Status falls back to [`TaskStatus::Todo`].
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            name: self.name,
            category: self.category,
            due_date: self.due_date,
            status: self.status.unwrap_or_default(),
        }
    }
}

/// Partial update. `None` leaves the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
    }

    pub fn validate(&self) -> Result<(), TaskError> {
        match &self.due_date {
            Some(due_date) => validate_due_date(due_date),
            None => Ok(()),
        }
    }

    /// Overwrite the present fields. Call [`TaskPatch::validate`] first.
    pub fn apply_to(self, task: &mut Task) {
        if let Some(name) = self.name {
            task.name = name;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

/// Accept only a real calendar date written exactly as `YYYY-MM-DD`.
///
/// chrono tolerates unpadded fields when parsing, so the value is rendered
/// back and compared to reject forms like `2023-1-1`.
pub fn validate_due_date(value: &str) -> Result<(), TaskError> {
    let invalid = || TaskError::InvalidDueDate(value.to_string());
    let date = NaiveDate::parse_from_str(value, DUE_DATE_FORMAT).map_err(|_| invalid())?;
    if date.format(DUE_DATE_FORMAT).to_string() != value {
        return Err(invalid());
    }
    Ok(())
}
