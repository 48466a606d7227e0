/// Database models for Taskboard
///
/// This module contains the two entity models and their SQL accessors.
///
/// # Models
///
/// - `user`: User accounts that own tasks
/// - `task`: Tasks, each owned by exactly one user
///
/// All accessors take a `&mut SqliteConnection` so they compose inside a
/// single transaction scope; the `store` module owns transaction begin and
/// commit. Ownership navigation is consistent in both directions: a task in
/// a user's eagerly-loaded set always has `user_id` equal to that user's id,
/// because the set is fetched by that very column inside the same scope.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::{CreateUser, User};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
/// let mut tx = pool.begin().await?;
/// let user = User::create(
///     &mut tx,
///     CreateUser {
///         name: "Alice".to_string(),
///         email: "a@x.com".to_string(),
///     },
/// )
/// .await?;
/// tx.commit().await?;
/// println!("Created user: {}", user.id);
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
