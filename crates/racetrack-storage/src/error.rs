use thiserror::Error;

/// Storage-specific error types for the racetrack persistence gateway.
///
/// Faults are propagated as-is; nothing in this crate retries or hides them.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection or query execution failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration execution failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Session payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A unique or primary key constraint rejected the write
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// A foreign key constraint rejected the write
    #[error("Referential integrity error: {0}")]
    Constraint(String),

    /// A stored value could not be mapped to a domain type
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Classify a failed write.
    ///
    /// SQLite constraint violations become [`StorageError::Duplicate`] or
    /// [`StorageError::Constraint`] carrying `context`; every other failure
    /// stays a generic [`StorageError::Database`].
    pub fn from_write(err: sqlx::Error, context: impl Into<String>) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StorageError::Duplicate(context.into());
            }
            if db_err.is_foreign_key_violation() {
                return StorageError::Constraint(context.into());
            }
        }
        StorageError::Database(err)
    }
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
