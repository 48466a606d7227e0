/// User endpoints
///
/// # Endpoints
///
/// - `POST /v1/users` - Create user
/// - `GET /v1/users` - List users with their tasks
/// - `GET /v1/users/:id` - Get one user with their tasks
/// - `DELETE /v1/users/:id` - Delete a user (fails while tasks remain)
/// - `GET /v1/users/:id/tasks` - List one user's tasks
///
/// User reads load the owned task set eagerly by default; pass
/// `?tasks=deferred` to skip the relationship query.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskboard_shared::models::task::Task;
use taskboard_shared::models::user::{CreateUser, User, UserWithTasks};
use taskboard_shared::store::TaskFetch;
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Display name (free text)
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Query parameters for user reads
#[derive(Debug, Default, Deserialize)]
pub struct UserReadQuery {
    /// Relationship fetch strategy (default: eager)
    pub tasks: Option<TaskFetch>,
}

/// Create a new user
///
/// # Endpoint
///
/// ```text
/// POST /v1/users
/// Content-Type: application/json
///
/// {
///   "name": "Alice",
///   "email": "a@x.com"
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    req.validate()?;

    let user = state
        .store
        .create_user(CreateUser {
            name: req.name,
            email: req.email,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by id, with their tasks
///
/// # Errors
///
/// - `404 Not Found`: No user with that id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<UserReadQuery>,
) -> ApiResult<Json<UserWithTasks>> {
    let user = state
        .store
        .get_user(id, query.tasks.unwrap_or_default())
        .await?;

    Ok(Json(user))
}

/// List all users in insertion order, with their tasks
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserReadQuery>,
) -> ApiResult<Json<Vec<UserWithTasks>>> {
    let users = state
        .store
        .list_users(query.tasks.unwrap_or_default())
        .await?;

    Ok(Json(users))
}

/// Delete a user, returning the pre-deletion snapshot
///
/// # Errors
///
/// - `404 Not Found`: No user with that id
/// - `409 Conflict`: The user still owns tasks
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    let user = state.store.delete_user(id).await?;

    Ok(Json(user))
}

/// List one user's tasks in insertion order
///
/// # Errors
///
/// - `404 Not Found`: No user with that id
pub async fn list_user_tasks(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.store.list_tasks_for_user(id).await?;

    Ok(Json(tasks))
}
