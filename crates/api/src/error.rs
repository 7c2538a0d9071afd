//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` that captures server errors to Sentry before
//! responding. All route handlers return `Result<T, AppError>`. Status codes
//! are differentiated (400/401/403/404/409/500/502), while the response
//! bodies keep the `{"msg": ...}` / `{"errors": [...]}` shapes and message
//! strings existing clients consume.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use alderwood_core::AccountKind;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::email::EmailError;
use crate::services::orders::OrderError;
use crate::services::password_reset::PasswordResetError;
use crate::validation::FieldError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// One or more request fields failed validation.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(AuthError),

    /// Order operation failed.
    #[error("order error: {0}")]
    Order(OrderError),

    /// Password reset operation failed.
    #[error("password reset error: {0}")]
    Reset(PasswordResetError),

    /// Email delivery failed.
    #[error("email error: {0}")]
    Email(EmailError),

    /// Database operation failed.
    #[error("database error: {0}")]
    Repository(RepositoryError),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Conflicting state (duplicates, closed orders).
    #[error("{0}")]
    Conflict(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

// Validation failures are flattened into `AppError::Validation` so every
// route produces the same `{"errors": [...]}` body for them.

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(errors) => Self::Validation(errors),
            other => Self::Auth(other),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::Validation(errors) => Self::Validation(errors),
            other => Self::Order(other),
        }
    }
}

impl From<PasswordResetError> for AppError {
    fn from(e: PasswordResetError) -> Self {
        match e {
            PasswordResetError::Validation(errors) => Self::Validation(errors),
            other => Self::Reset(other),
        }
    }
}

impl From<EmailError> for AppError {
    fn from(e: EmailError) -> Self {
        Self::Email(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        Self::Repository(e)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::AlreadyExists(_) => StatusCode::CONFLICT,
                AuthError::NotFound(_) => StatusCode::NOT_FOUND,
                AuthError::Validation(_) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::Token(_) | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Order(err) => match err {
                OrderError::NotFound => StatusCode::NOT_FOUND,
                OrderError::NotOwner => StatusCode::FORBIDDEN,
                OrderError::AlreadyClosed => StatusCode::CONFLICT,
                OrderError::Validation(_) => StatusCode::BAD_REQUEST,
                OrderError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Reset(err) => match err {
                PasswordResetError::AccountNotFound(_) => StatusCode::NOT_FOUND,
                PasswordResetError::InvalidOrExpiredToken(_)
                | PasswordResetError::Validation(_) => StatusCode::BAD_REQUEST,
                PasswordResetError::Email(_) => StatusCode::BAD_GATEWAY,
                PasswordResetError::Hash | PasswordResetError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Email(_) => StatusCode::BAD_GATEWAY,
            Self::Repository(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal details never leak here.
    fn message(&self) -> String {
        match self {
            Self::Validation(_) => "Validation failed.".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials.".to_string(),
                AuthError::AlreadyExists(kind) => format!("{} already exists.", kind.noun()),
                AuthError::NotFound(kind) => format!("{} not found.", kind.noun()),
                AuthError::Validation(_) => "Validation failed.".to_string(),
                AuthError::PasswordHash | AuthError::Token(_) | AuthError::Repository(_) => {
                    "Internal server error.".to_string()
                }
            },
            Self::Order(err) => match err {
                OrderError::NotFound => "No such order found.".to_string(),
                OrderError::NotOwner => "You do not have access to this order.".to_string(),
                OrderError::AlreadyClosed => "The order has already been closed.".to_string(),
                OrderError::Validation(_) => "Validation failed.".to_string(),
                OrderError::Repository(_) => "Internal server error.".to_string(),
            },
            Self::Reset(err) => match err {
                PasswordResetError::AccountNotFound(kind) => match kind {
                    AccountKind::User => "User not found.".to_string(),
                    AccountKind::Administrator => "Admin not found.".to_string(),
                },
                PasswordResetError::InvalidOrExpiredToken(kind) => format!(
                    "{} not found. Please get another link and try again.",
                    kind.noun()
                ),
                PasswordResetError::Validation(_) => "Validation failed.".to_string(),
                PasswordResetError::Email(_) => {
                    "Failed to send the email. Please try again.".to_string()
                }
                PasswordResetError::Hash | PasswordResetError::Repository(_) => {
                    "Internal server error.".to_string()
                }
            },
            Self::Email(_) => "Failed to send the email. Please try again.".to_string(),
            Self::Repository(err) => match err {
                RepositoryError::NotFound => "Not found.".to_string(),
                RepositoryError::Conflict(_) => "An error occurred. Please try again.".to_string(),
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    "Internal server error.".to_string()
                }
            },
            Self::NotFound(msg) | Self::Conflict(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Internal(_) => "Internal server error.".to_string(),
        }
    }

    fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        let body = match &self {
            Self::Validation(errors) | Self::Auth(AuthError::Validation(errors)) => {
                json!({ "errors": errors })
            }
            _ => json!({ "msg": self.message() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
