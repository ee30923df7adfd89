//! The error type shared by every handler and its JSON rendering.
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// A username or email that is already taken.
    ///
    /// Reported as 400 rather than 409, which is what existing clients expect.
    #[error("{0}")]
    Conflict(String),

    /// Missing, invalid or expired token, or bad credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Correct credentials for an account whose email has not been verified.
    #[error("User not verified")]
    Unverified { email: String },

    /// The owned resource does not exist, or the statement touched no rows.
    #[error("{0}")]
    NotFound(String),

    /// An external collaborator (mail, payment gateway, AI service) failed.
    #[error("{message}")]
    Dependency {
        message: String,
        details: Option<String>,
    },

    /// Anything else. The cause is logged, never sent to the client.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn dependency(msg: impl Into<String>) -> Self {
        Self::Dependency {
            message: msg.into(),
            details: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Unverified { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Dependency { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Unverified { email } => json!({
                "error": self.to_string(),
                "unverified": true,
                "email": email,
            }),
            AppError::Dependency {
                message,
                details: Some(details),
            } => json!({ "error": message, "details": details }),
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                json!({ "error": "Internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(e.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
