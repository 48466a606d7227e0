/// Domain error taxonomy for store operations
///
/// Every repository operation returns `Result<T, StoreError>`. All variants
/// are deterministic outcomes of the current data state except `Database`,
/// which wraps transport-level storage failures and is never retried here.
///
/// A failed operation always leaves persisted state unchanged: operations
/// run inside a single transaction scope that rolls back on error.

use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for repository operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced entity id does not exist
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind ("user" or "task")
        entity: &'static str,
        /// The id that failed to resolve
        id: i64,
    },

    /// A uniqueness or ownership constraint was violated
    #[error("conflict on {entity}.{field}: {value}")]
    Conflict {
        /// Entity kind the conflict occurred on
        entity: &'static str,
        /// Field or relation in conflict
        field: &'static str,
        /// Offending value, for the user-facing message
        value: String,
    },

    /// Malformed input reached the core (e.g. empty required field)
    #[error("invalid {field}: {message}")]
    Validation {
        /// Field that failed validation
        field: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// Storage-layer failure (connection loss, malformed query, ...)
    ///
    /// Propagated to the transport layer as-is; the core performs no
    /// retries.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Shorthand for a missing user
    pub fn user_not_found(id: i64) -> Self {
        StoreError::NotFound { entity: "user", id }
    }

    /// Shorthand for a missing task
    pub fn task_not_found(id: i64) -> Self {
        StoreError::NotFound { entity: "task", id }
    }
}
