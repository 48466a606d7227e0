/// Task model and database operations
///
/// This module provides the Task model. A task is owned by exactly one
/// user and cannot exist without a valid owner; the store verifies the
/// owner inside the same transaction that inserts the task.
///
/// # Lifecycle
///
/// ```text
/// nonexistent → active   (create)
/// active      → active   (update, self-loop)
/// active      → removed  (delete, terminal)
/// ```
///
/// Ids are never reused, so a removed task cannot be re-created with the
/// same identity.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     title TEXT NOT NULL,
///     text TEXT,
///     created_at DATETIME NOT NULL,
///     updated_at DATETIME,
///     user_id INTEGER NOT NULL REFERENCES users(id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;

/// Task model representing one unit of work owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task id (server-assigned, immutable)
    pub id: i64,

    /// Title (required, non-empty)
    pub title: String,

    /// Optional free text body
    pub text: Option<String>,

    /// When the task was created (set once, immutable)
    pub created_at: DateTime<Utc>,

    /// When the task was last updated (None until the first update)
    pub updated_at: Option<DateTime<Utc>>,

    /// Id of the owning user
    pub user_id: i64,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Title (required, non-empty)
    pub title: String,

    /// Optional free text body
    pub text: Option<String>,

    /// Id of the owning user (must exist at creation time)
    pub user_id: i64,
}

/// Input for partially updating a task
///
/// Absent fields leave the current value untouched. A present value always
/// overwrites, including an explicitly-empty `text`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title (must be non-empty if present)
    pub title: Option<String>,

    /// New text body
    pub text: Option<String>,
}

impl UpdateTask {
    /// True when no field is present, i.e. the update is a no-op
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.text.is_none()
    }
}

impl Task {
    /// Inserts a new task and returns the persisted row
    ///
    /// `created_at` is set to the current time; `updated_at` starts out
    /// NULL. Owner existence must be verified by the caller inside the same
    /// transaction; the foreign key constraint is the backstop.
    pub async fn create(conn: &mut SqliteConnection, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, text, created_at, updated_at, user_id)
            VALUES (?, ?, ?, NULL, ?)
            RETURNING id, title, text, created_at, updated_at, user_id
            "#,
        )
        .bind(data.title)
        .bind(data.text)
        .bind(Utc::now())
        .bind(data.user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(task)
    }

    /// Finds a task by id
    ///
    /// Returns the task if found, None otherwise.
    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, text, created_at, updated_at, user_id
            FROM tasks
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(task)
    }

    /// Lists all tasks in insertion order, regardless of owner
    pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, text, created_at, updated_at, user_id
            FROM tasks
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(tasks)
    }

    /// Lists one user's tasks in insertion order
    pub async fn list_by_user(
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, text, created_at, updated_at, user_id
            FROM tasks
            WHERE user_id = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(tasks)
    }

    /// Counts all tasks
    pub async fn count(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(&mut *conn)
            .await?;

        Ok(count)
    }

    /// Counts one user's tasks
    pub async fn count_by_user(
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(count)
    }

    /// Applies a partial update and returns the updated row
    ///
    /// Builds the UPDATE statement from the fields that are present and
    /// stamps `updated_at` with the current time. The caller must not pass
    /// an empty update (see `UpdateTask::is_empty`); an empty update must
    /// not touch `updated_at`.
    ///
    /// Returns None if no task with that id exists.
    pub async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = ?");

        if data.title.is_some() {
            query.push_str(", title = ?");
        }
        if data.text.is_some() {
            query.push_str(", text = ?");
        }

        query.push_str(" WHERE id = ? RETURNING id, title, text, created_at, updated_at, user_id");

        let mut q = sqlx::query_as::<_, Task>(&query).bind(Utc::now());

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(text) = data.text {
            q = q.bind(text);
        }

        let task = q.bind(id).fetch_optional(&mut *conn).await?;

        Ok(task)
    }

    /// Deletes a task by id, returning the pre-deletion snapshot
    ///
    /// Returns None if no task with that id exists, so a second delete of
    /// the same id reports the task as missing rather than failing loudly.
    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            DELETE FROM tasks
            WHERE id = ?
            RETURNING id, title, text, created_at, updated_at, user_id
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_struct() {
        let create_task = CreateTask {
            title: "Buy milk".to_string(),
            text: Some("2%".to_string()),
            user_id: 1,
        };

        assert_eq!(create_task.title, "Buy milk");
        assert_eq!(create_task.text.as_deref(), Some("2%"));
        assert_eq!(create_task.user_id, 1);
    }

    #[test]
    fn test_update_task_default_is_empty() {
        let update = UpdateTask::default();
        assert!(update.title.is_none());
        assert!(update.text.is_none());
        assert!(update.is_empty());
    }

    #[test]
    fn test_update_task_with_text_only_is_not_empty() {
        let update = UpdateTask {
            text: Some("Whole".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert!(update.title.is_none());
    }

    // Database-backed tests live in tests/store_test.rs
}
