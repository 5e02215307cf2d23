//! Service error type converging core and database errors.

use thiserror::Error;

use rmd_core::CoreError;
use rmd_db::error::DatabaseError;

/// Errors surfaced by the service layer.
///
/// Validation, not-found, and permission failures arrive as [`CoreError`]
/// variants and never follow a mutation. Mail dispatch failures are *not*
/// represented here: they are logged and isolated per task, never propagated
/// as a failure of the surrounding operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl ServiceError {
    /// Convenience constructor for validation failures.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Core(CoreError::Validation(message.into()))
    }
}
