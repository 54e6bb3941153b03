use barbershop_core::error::CoreError;

/// Error returned by every [`crate::store::ScheduleStore`] operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Domain failure: validation, missing entity, or version conflict.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
