//! Task API endpoints.
//!
//! - List tasks (filter by category, sort by field and direction)
//! - Get a task
//! - Create a task
//! - Update a task (partial)
//! - Delete a task

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::task::{ListQuery, NewTask, Task, TaskPatch};

use super::error::{parse_task_id, ApiError};
use super::routes::AppState;

/// Create task routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/:id", get(get_task).put(update_task).delete(delete_task))
}

// ─────────────────────────────────────────────────────────────────────────────
// Request/Response Types
// ─────────────────────────────────────────────────────────────────────────────

/// Query parameters for listing tasks.
///
/// Built from raw pairs so repeated or unknown keys never reject the
/// request; the first occurrence of a key wins.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListTasksQuery {
    pub category: Option<String>,
    /// One of `id`, `name`, `category`, `dueDate`, `status`
    pub sort_by: Option<String>,
    /// `asc` or `desc`
    pub sort_dir: Option<String>,
}

impl ListTasksQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "category" => &mut query.category,
                "sortBy" => &mut query.sort_by,
                "sortDir" => &mut query.sort_dir,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

impl From<&ListTasksQuery> for ListQuery {
    fn from(q: &ListTasksQuery) -> Self {
        ListQuery::from_params(
            q.category.as_deref(),
            q.sort_by.as_deref(),
            q.sort_dir.as_deref(),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /tasks - List tasks.
async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<Task>> {
    let query = ListQuery::from(&ListTasksQuery::from_pairs(pairs));
    let tasks = state.tasks.read().await.list(&query);
    Json(tasks)
}

/// GET /tasks/:id - Get a task.
async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_task_id(&id)?;
    let store = state.tasks.read().await;
    let task = store.get(id)?;
    Ok(Json(task.clone()))
}

/// POST /tasks - Create a task.
async fn create_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(new_task) = payload?;
    let task = state.tasks.write().await.create(new_task)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /tasks/:id - Update the fields present in the body.
///
/// An empty body is an empty patch and returns the task unchanged.
async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_task_id(&id)?;
    let patch = parse_patch(&body?)?;
    let task = state.tasks.write().await.update(id, patch)?;
    Ok(Json(task))
}

/// DELETE /tasks/:id - Delete a task.
async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteTaskResponse>, ApiError> {
    let id = parse_task_id(&id)?;
    state.tasks.write().await.delete(id)?;
    Ok(Json(DeleteTaskResponse {
        message: format!("Task {} deleted", id),
    }))
}

fn parse_patch(body: &[u8]) -> Result<TaskPatch, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(TaskPatch::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidPayload(e.to_string()))
}
