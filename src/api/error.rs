//! API error type and its mapping to HTTP responses.

use std::num::ParseIntError;

use axum::{
    extract::rejection::{BytesRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::task::{TaskError, TaskId};

/// Errors surfaced by task handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Path id is not a non-negative integer.
    #[error("Invalid task ID: {0}")]
    InvalidId(#[from] ParseIntError),

    /// Body could not be parsed into the expected shape.
    #[error("Invalid request payload: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Task(#[from] TaskError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidId(_) | Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::Task(TaskError::InvalidDueDate(_)) => StatusCode::BAD_REQUEST,
            Self::Task(TaskError::NotFound(_)) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidPayload(rejection.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::InvalidPayload(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        tracing::warn!(status = status.as_u16(), "{}", message);
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Parse a path segment as a task id.
pub fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    Ok(raw.parse::<TaskId>()?)
}
