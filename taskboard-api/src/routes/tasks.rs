/// Task endpoints
///
/// # Endpoints
///
/// - `POST /v1/tasks` - Create task (owner must exist)
/// - `GET /v1/tasks` - List all tasks
/// - `GET /v1/tasks/:id` - Get task
/// - `PUT /v1/tasks/:id` - Partially update task
/// - `DELETE /v1/tasks/:id` - Delete task, returning the snapshot
///
/// Updates are partial: absent fields keep their current value, present
/// fields overwrite (including an explicitly-empty `text`).

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskboard_shared::models::task::{CreateTask, Task, UpdateTask};
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title (required, non-empty)
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    /// Optional free text body
    pub text: Option<String>,

    /// Id of the owning user
    pub user_id: i64,
}

/// Update task request
///
/// Absent fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title (must be non-empty if present)
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,

    /// New text body
    pub text: Option<String>,
}

/// Create a new task owned by an existing user
///
/// # Endpoint
///
/// ```text
/// POST /v1/tasks
/// Content-Type: application/json
///
/// {
///   "title": "Buy milk",
///   "text": "2%",
///   "user_id": 1
/// }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No user with `user_id`
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let task = state
        .store
        .create_task(CreateTask {
            title: req.title,
            text: req.text,
            user_id: req.user_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Get a task by id
///
/// # Errors
///
/// - `404 Not Found`: No task with that id
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let task = state.store.get_task(id).await?;

    Ok(Json(task))
}

/// List all tasks in insertion order, regardless of owner
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.store.list_tasks().await?;

    Ok(Json(tasks))
}

/// Partially update a task
///
/// # Errors
///
/// - `404 Not Found`: No task with that id
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = state
        .store
        .update_task(
            id,
            UpdateTask {
                title: req.title,
                text: req.text,
            },
        )
        .await?;

    Ok(Json(task))
}

/// Delete a task, returning the pre-deletion snapshot
///
/// # Errors
///
/// - `404 Not Found`: No task with that id (including a repeated delete)
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let task = state.store.delete_task(id).await?;

    Ok(Json(task))
}
