/// Transactional store: the repository operations for users and tasks
///
/// `Store` wraps the connection pool and gives every operation exactly one
/// unit of work: a transaction is begun on entry, reads and writes inside
/// the operation observe each other (read-your-writes), and the scope ends
/// with exactly one commit or one rollback. The rollback path needs no
/// code of its own — dropping an uncommitted `sqlx::Transaction` rolls it
/// back, which also covers callers that abandon the future mid-operation.
///
/// Referential integrity (a task's owner must exist) and email uniqueness
/// are checked inside the same transaction that performs the write, so a
/// failed check leaves no partial state behind. Concurrent scopes are
/// isolated by the storage engine; the store holds no in-process locks.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::CreateUser;
/// use taskboard_shared::store::{Store, TaskFetch};
///
/// # async fn example(pool: sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
/// let store = Store::new(pool);
///
/// let user = store
///     .create_user(CreateUser {
///         name: "Alice".to_string(),
///         email: "a@x.com".to_string(),
///     })
///     .await?;
///
/// let read = store.get_user(user.id, TaskFetch::Eager).await?;
/// assert_eq!(read.tasks.unwrap().len(), 0);
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use validator::ValidateEmail;

use crate::error::{StoreError, StoreResult};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::{CreateUser, User, UserWithTasks};

/// Relationship fetch strategy for user reads
///
/// `Eager` loads the complete owned task set in the same unit of work.
/// `Deferred` skips the relationship query entirely; the returned
/// `UserWithTasks` then carries no task set at all rather than an empty or
/// partial one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFetch {
    /// Load the full task set as part of the read
    #[default]
    Eager,

    /// Skip the relationship query
    Deferred,
}

/// Repository over the users/tasks tables
///
/// Cheap to clone; clones share the underlying pool.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Creates a store on top of an explicitly constructed pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates a new user
    ///
    /// The email must be syntactically valid and unused. The uniqueness
    /// check and the insert run in one transaction, so a duplicate fails
    /// with `Conflict` before any row is persisted.
    pub async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        if !data.email.validate_email() {
            return Err(StoreError::Validation {
                field: "email",
                message: format!("'{}' is not a valid email address", data.email),
            });
        }

        let mut tx = self.pool.begin().await?;

        if User::find_by_email(&mut tx, &data.email).await?.is_some() {
            return Err(StoreError::Conflict {
                entity: "user",
                field: "email",
                value: data.email,
            });
        }

        let user = User::create(&mut tx, data).await?;
        tx.commit().await?;

        debug!(user_id = user.id, "Created user");
        Ok(user)
    }

    /// Fetches a user by id, with its task set loaded per `fetch`
    ///
    /// With `TaskFetch::Eager` the returned set is the complete current
    /// ownership set, read in the same unit of work as the user row.
    pub async fn get_user(&self, id: i64, fetch: TaskFetch) -> StoreResult<UserWithTasks> {
        let mut tx = self.pool.begin().await?;

        let user = User::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| StoreError::user_not_found(id))?;

        let read = match fetch {
            TaskFetch::Eager => {
                let tasks = Task::list_by_user(&mut tx, id).await?;
                UserWithTasks::eager(user, tasks)
            }
            TaskFetch::Deferred => UserWithTasks::deferred(user),
        };

        tx.commit().await?;
        Ok(read)
    }

    /// Lists all users in insertion order
    ///
    /// The eager variant loads every task once and groups by owner, so the
    /// whole listing costs two queries regardless of user count.
    pub async fn list_users(&self, fetch: TaskFetch) -> StoreResult<Vec<UserWithTasks>> {
        let mut tx = self.pool.begin().await?;

        let users = User::list(&mut tx).await?;

        let reads = match fetch {
            TaskFetch::Deferred => users.into_iter().map(UserWithTasks::deferred).collect(),
            TaskFetch::Eager => {
                let mut by_owner: HashMap<i64, Vec<Task>> = HashMap::new();
                for task in Task::list(&mut tx).await? {
                    by_owner.entry(task.user_id).or_default().push(task);
                }
                users
                    .into_iter()
                    .map(|user| {
                        let tasks = by_owner.remove(&user.id).unwrap_or_default();
                        UserWithTasks::eager(user, tasks)
                    })
                    .collect()
            }
        };

        tx.commit().await?;
        Ok(reads)
    }

    /// Deletes a user, returning the pre-deletion snapshot
    ///
    /// Deletion is restricted: a user that still owns tasks fails with
    /// `Conflict` and nothing is removed. The tasks must be deleted first.
    pub async fn delete_user(&self, id: i64) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;

        if User::find_by_id(&mut tx, id).await?.is_none() {
            return Err(StoreError::user_not_found(id));
        }

        let owned = Task::count_by_user(&mut tx, id).await?;
        if owned > 0 {
            return Err(StoreError::Conflict {
                entity: "user",
                field: "tasks",
                value: format!("{} tasks still owned", owned),
            });
        }

        let user = User::delete(&mut tx, id)
            .await?
            .ok_or_else(|| StoreError::user_not_found(id))?;
        tx.commit().await?;

        debug!(user_id = user.id, "Deleted user");
        Ok(user)
    }

    /// Creates a new task owned by an existing user
    ///
    /// The owner is verified in the same transaction as the insert; a
    /// missing owner fails with `NotFound` naming the user id, and no task
    /// row is written. `created_at` is stamped now, `updated_at` stays
    /// unset until the first update.
    pub async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        if data.title.trim().is_empty() {
            return Err(StoreError::Validation {
                field: "title",
                message: "must not be empty".to_string(),
            });
        }

        let mut tx = self.pool.begin().await?;

        if User::find_by_id(&mut tx, data.user_id).await?.is_none() {
            return Err(StoreError::user_not_found(data.user_id));
        }

        let task = Task::create(&mut tx, data).await?;
        tx.commit().await?;

        debug!(task_id = task.id, user_id = task.user_id, "Created task");
        Ok(task)
    }

    /// Fetches a task by id
    pub async fn get_task(&self, id: i64) -> StoreResult<Task> {
        let mut tx = self.pool.begin().await?;

        let task = Task::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| StoreError::task_not_found(id))?;

        tx.commit().await?;
        Ok(task)
    }

    /// Lists all tasks in insertion order, with no ownership filter
    pub async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let mut tx = self.pool.begin().await?;
        let tasks = Task::list(&mut tx).await?;
        tx.commit().await?;
        Ok(tasks)
    }

    /// Lists one user's tasks in insertion order
    ///
    /// Fails with `NotFound` if the user itself does not exist, which
    /// distinguishes "no such user" from "user with no tasks".
    pub async fn list_tasks_for_user(&self, user_id: i64) -> StoreResult<Vec<Task>> {
        let mut tx = self.pool.begin().await?;

        if User::find_by_id(&mut tx, user_id).await?.is_none() {
            return Err(StoreError::user_not_found(user_id));
        }

        let tasks = Task::list_by_user(&mut tx, user_id).await?;
        tx.commit().await?;
        Ok(tasks)
    }

    /// Partially updates a task
    ///
    /// Absent fields keep their current value; a present field overwrites,
    /// including an explicitly-empty `text`. When at least one field is
    /// applied, `updated_at` is stamped with the current time. An update
    /// with no fields present returns the current row untouched.
    pub async fn update_task(&self, id: i64, data: UpdateTask) -> StoreResult<Task> {
        if let Some(title) = &data.title {
            if title.trim().is_empty() {
                return Err(StoreError::Validation {
                    field: "title",
                    message: "must not be empty".to_string(),
                });
            }
        }

        let mut tx = self.pool.begin().await?;

        let existing = Task::find_by_id(&mut tx, id)
            .await?
            .ok_or_else(|| StoreError::task_not_found(id))?;

        if data.is_empty() {
            tx.commit().await?;
            return Ok(existing);
        }

        let task = Task::update(&mut tx, id, data)
            .await?
            .ok_or_else(|| StoreError::task_not_found(id))?;
        tx.commit().await?;

        debug!(task_id = task.id, "Updated task");
        Ok(task)
    }

    /// Deletes a task, returning the pre-deletion snapshot
    ///
    /// Deletion is unconditional once existence is confirmed and has no
    /// effect on the owning user. A second delete of the same id fails
    /// with `NotFound`.
    pub async fn delete_task(&self, id: i64) -> StoreResult<Task> {
        let mut tx = self.pool.begin().await?;

        let task = Task::delete(&mut tx, id)
            .await?
            .ok_or_else(|| StoreError::task_not_found(id))?;
        tx.commit().await?;

        debug!(task_id = task.id, "Deleted task");
        Ok(task)
    }
}
