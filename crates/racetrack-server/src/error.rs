use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use racetrack_auth::AuthError;
use racetrack_storage::StorageError;
use serde_json::json;
use thiserror::Error;

/// Every failure a handler can return. Rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Field rules failed; messages are joined with newlines
    #[error("{}", .0.join("\n"))]
    Validation(Vec<String>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Specialized result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Storage(StorageError::Duplicate(_) | StorageError::Constraint(_)) => {
                StatusCode::CONFLICT
            }
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<racetrack_core::Error> for ApiError {
    fn from(err: racetrack_core::Error) -> Self {
        match err {
            racetrack_core::Error::Validation(messages) => ApiError::Validation(messages),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ValidationFailed(e) => e.into(),
            AuthError::DuplicateUsername => {
                ApiError::Conflict("Username already exists".to_string())
            }
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            AuthError::Storage(e) => ApiError::Storage(e),
            AuthError::Hashing(reason) => ApiError::Internal(reason),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Error: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(format!("Error: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Storage(StorageError::Duplicate(context)) => {
                format!("Record already exists: {context}")
            }
            ApiError::Storage(StorageError::Constraint(context)) => {
                format!("Referenced record conflict: {context}")
            }
            ApiError::Storage(err) => {
                tracing::error!(error = ?err, "Storage error.");
                "Internal server error".to_string()
            }
            ApiError::Internal(reason) => {
                tracing::error!(%reason, "Internal error.");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
