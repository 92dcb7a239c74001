use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::MessageResponse;

/// ApiError
///
/// The application error taxonomy. Every handler returns `Result<_, ApiError>`
/// and every failure surfaces to the client as a flat `{"message": string}`
/// body with the status code encoding the category.
///
/// Conflicts (duplicate email/category, last-superadmin protection,
/// self-delete) deliberately map to 400 rather than 409 to keep the wire
/// contract of the original deployment.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed fields (400).
    #[error("{0}")]
    Validation(String),

    /// Duplicate resources and protected-invariant violations (400).
    #[error("{0}")]
    Conflict(String),

    /// Missing/invalid/expired token or bad credentials (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Valid token, insufficient role (403).
    #[error("{0}")]
    Forbidden(String),

    /// Unknown id or platform (404).
    #[error("{0}")]
    NotFound(String),

    /// Store or media-host failure (500). The detail is logged, not leaked.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "internal error");
                "Something went wrong!".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(MessageResponse { message })).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                ApiError::Conflict("Resource already exists".to_string())
            }
            _ => ApiError::Internal(format!("database error: {e}")),
        }
    }
}
