use racetrack_storage::StorageError;
use thiserror::Error;

/// Failures of the account and session operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credentials broke the registration rules; carries every message
    #[error("{0}")]
    ValidationFailed(#[from] racetrack_core::Error),

    #[error("Username already exists")]
    DuplicateUsername,

    /// Unknown username or wrong password. Both render the same message.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Hashing failed or a stored digest could not be parsed
    #[error("Password hashing error: {0}")]
    Hashing(String),
}

/// Specialized result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;
