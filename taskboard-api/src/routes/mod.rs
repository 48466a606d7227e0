/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: User endpoints (create, read, list, delete, per-user tasks)
/// - `tasks`: Task endpoints (create, read, list, update, delete)

pub mod health;
pub mod tasks;
pub mod users;
