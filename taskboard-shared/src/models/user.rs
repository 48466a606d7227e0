/// User model and database operations
///
/// This module provides the User model and its SQL accessors. Users own
/// zero or more tasks via the `tasks.user_id` foreign key.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name TEXT NOT NULL,
///     email TEXT NOT NULL UNIQUE
/// );
/// ```
///
/// Ids are server-assigned and immutable. Email uniqueness is checked by
/// the store before insertion and backed by the UNIQUE constraint.

use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;

use crate::models::task::Task;

/// User model representing a task owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user id (server-assigned, immutable)
    pub id: i64,

    /// Display name (free text)
    pub name: String,

    /// Email address
    ///
    /// Must be unique across all users
    pub email: String,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Display name
    pub name: String,

    /// Email address (must be unused and syntactically valid)
    pub email: String,
}

/// A user read together with its relationship to tasks
///
/// `tasks` is `Some` with the complete owned set when the caller asked for
/// eager loading, and `None` when loading was deferred. A partially-loaded
/// set is not representable.
#[derive(Debug, Clone, Serialize)]
pub struct UserWithTasks {
    /// Unique user id
    pub id: i64,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Owned tasks, in insertion order; `None` when loading was deferred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
}

impl UserWithTasks {
    /// Wraps a user with its eagerly-loaded task set
    pub fn eager(user: User, tasks: Vec<Task>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            tasks: Some(tasks),
        }
    }

    /// Wraps a user without loading its tasks
    pub fn deferred(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            tasks: None,
        }
    }
}

impl User {
    /// Inserts a new user and returns the persisted row
    ///
    /// The id is assigned by the database. Uniqueness of the email must be
    /// checked by the caller inside the same transaction; the UNIQUE
    /// constraint is the backstop.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (e.g. constraint violation or
    /// connection loss)
    pub async fn create(conn: &mut SqliteConnection, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email)
            VALUES (?, ?)
            RETURNING id, name, email
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .fetch_one(&mut *conn)
        .await?;

        Ok(user)
    }

    /// Finds a user by id
    ///
    /// Returns the user if found, None otherwise.
    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// Returns the user if found, None otherwise.
    pub async fn find_by_email(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(user)
    }

    /// Lists all users in insertion order
    pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(users)
    }

    /// Counts users with the given email
    ///
    /// Used by tests to assert the uniqueness invariant.
    pub async fn count_by_email(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&mut *conn)
            .await?;

        Ok(count)
    }

    /// Deletes a user by id, returning the pre-deletion snapshot
    ///
    /// Returns None if no user with that id exists. Ownership restrictions
    /// (a user still owning tasks) are enforced by the store before this
    /// runs; the foreign key constraint is the backstop.
    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            DELETE FROM users
            WHERE id = ?
            RETURNING id, name, email
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(user)
    }
}
