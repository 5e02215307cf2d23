//! Cross-cutting error types for Remind.
//!
//! Domain-specific errors (`DatabaseError`, `MailError`) are defined in their
//! respective crates; `rmd-service` converges them into `ServiceError`.

use thiserror::Error;

/// Errors that can be raised by any Remind crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (missing field, bad date, invalid enum value).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity lookup returned no result.
    #[error("Task not found: {owner_id}/{task_id}")]
    NotFound { owner_id: String, task_id: String },

    /// The acting principal does not own the entity it tried to mutate.
    #[error("Permission denied: principal {principal} does not own task {task_id}")]
    PermissionDenied { principal: String, task_id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition for task {task_id}: {from} -> {to}")]
    InvalidTransition {
        task_id: String,
        from: String,
        to: String,
    },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
