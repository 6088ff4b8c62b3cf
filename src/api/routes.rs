//! HTTP server setup and top-level routes.

use std::sync::Arc;

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::task::{SharedTaskStore, TaskStore};

use super::tasks as tasks_api;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Task store, behind a single lock
    pub tasks: SharedTaskStore,
}

impl AppState {
    pub fn new(config: Config, tasks: TaskStore) -> Self {
        Self {
            config,
            tasks: tasks.into_shared(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Build the application router with middleware attached.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(intro))
        .route("/health", get(health))
        .nest("/tasks", tasks_api::routes())
        .layer(CatchPanicLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server with the seeded task store.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let tasks = TaskStore::seeded();
    tracing::info!("Seeded task store with {} tasks", tasks.len());

    let state = Arc::new(AppState::new(config.clone(), tasks));
    let app = router(Arc::clone(&state));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server");
}

/// Landing endpoint.
async fn intro() -> &'static str {
    "Welcome to the task manager!"
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    tracing::debug!(port = state.config.port, "Health check");
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::task::{Task, TaskStatus};

    const MAX_BODY: usize = 1024 * 1024;

    fn app_with(tasks: TaskStore) -> Router {
        router(Arc::new(AppState::new(Config::default(), tasks)))
    }

    fn two_task_app() -> Router {
        app_with(TaskStore::with_tasks(vec![
            Task::new(1, "Task 1", "Category 1", "2023-01-01", TaskStatus::Todo),
            Task::new(2, "Task 2", "Category 2", "2023-03-15", TaskStatus::Doing),
        ]))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(raw) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(raw.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), MAX_BODY).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn names(value: &Value) -> Vec<&str> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_intro_and_health() {
        let app = two_task_app();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), MAX_BODY).await.unwrap();
        assert_eq!(&bytes[..], b"Welcome to the task manager!");

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_sorted_by_due_date_desc() {
        let app = two_task_app();
        let (status, body) = send(&app, "GET", "/tasks?sortBy=dueDate&sortDir=desc", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["Task 2", "Task 1"]);
        assert_eq!(
            body[0],
            json!({
                "id": 2,
                "name": "Task 2",
                "category": "Category 2",
                "dueDate": "2023-03-15",
                "status": "doing"
            })
        );
    }

    #[tokio::test]
    async fn test_list_filters_by_category() {
        let app = app_with(TaskStore::seeded());
        let (status, body) = send(&app, "GET", "/tasks?category=Category%203", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["Task 3A", "Task 3B"]);
    }

    #[tokio::test]
    async fn test_list_repeated_query_key_uses_first_value() {
        let app = app_with(TaskStore::seeded());
        let (status, body) = send(
            &app,
            "GET",
            "/tasks?category=Category%201&category=x&sortDir=desc&sortDir=asc",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), vec!["Task 1"]);
    }

    #[tokio::test]
    async fn test_get_task() {
        let app = app_with(TaskStore::seeded());

        let (status, body) = send(&app, "GET", "/tasks/3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Task 3A");

        let (status, body) = send(&app, "GET", "/tasks/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Task not found" }));

        let (status, body) = send(&app, "GET", "/tasks/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid task ID: "));
    }

    #[tokio::test]
    async fn test_create_task() {
        let app = two_task_app();
        let (status, body) = send(
            &app,
            "POST",
            "/tasks",
            Some(r#"{"name":"Task 3","category":"Category 1","dueDate":"2023-05-05"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({
                "id": 3,
                "name": "Task 3",
                "category": "Category 1",
                "dueDate": "2023-05-05",
                "status": "todo"
            })
        );

        let (status, fetched) = send(&app, "GET", "/tasks/3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, body);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let app = two_task_app();

        let (status, body) = send(
            &app,
            "POST",
            "/tasks",
            Some(r#"{"name":"Task 3","category":"Category 1","dueDate":"13/01/2023"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid due date (format: YYYY-MM-DD)" }));

        let (status, body) = send(
            &app,
            "POST",
            "/tasks",
            Some(r#"{"name":"Task 3","category":"Category 1","dueDate":"2023-05-05","status":"later"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request payload: "));

        let (status, _) = send(&app, "POST", "/tasks", Some("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, list) = send(&app, "GET", "/tasks", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_task() {
        let app = two_task_app();

        let (status, body) = send(&app, "PUT", "/tasks/1", Some(r#"{"status":"DONE"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "id": 1,
                "name": "Task 1",
                "category": "Category 1",
                "dueDate": "2023-01-01",
                "status": "done"
            })
        );

        let (status, body) = send(&app, "PUT", "/tasks/1", Some(r#"{"name":"X"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "X");
        assert_eq!(body["status"], "done");
    }

    #[tokio::test]
    async fn test_update_with_empty_body_is_noop() {
        let app = two_task_app();
        let (_, before) = send(&app, "GET", "/tasks/2", None).await;

        let (status, body) = send(&app, "PUT", "/tasks/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, before);

        let (status, _) = send(&app, "PUT", "/tasks/9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_errors() {
        let app = two_task_app();

        let (status, _) = send(&app, "PUT", "/tasks/42", Some(r#"{"name":"X"}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "PUT", "/tasks/x", Some(r#"{"name":"X"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            "PUT",
            "/tasks/1",
            Some(r#"{"name":"X","dueDate":"2023-02-30"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid due date (format: YYYY-MM-DD)" }));

        let (_, unchanged) = send(&app, "GET", "/tasks/1", None).await;
        assert_eq!(unchanged["name"], "Task 1");
    }

    #[tokio::test]
    async fn test_delete_task_twice() {
        let app = two_task_app();

        let (status, body) = send(&app, "DELETE", "/tasks/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Task 2 deleted" }));

        let (status, body) = send(&app, "DELETE", "/tasks/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Task not found" }));

        let (_, list) = send(&app, "GET", "/tasks", None).await;
        assert_eq!(names(&list), vec!["Task 1"]);
    }
}
