//! Authentication error types.

use thiserror::Error;

use alderwood_core::AccountKind;

use crate::db::RepositoryError;
use crate::services::token::TokenError;
use crate::validation::FieldError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// One or more request fields failed validation.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// An account of this kind already uses the email.
    #[error("{} already exists.", .0.noun())]
    AlreadyExists(AccountKind),

    /// Wrong password or no such account; deliberately indistinguishable.
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// Account not found.
    #[error("{} not found.", .0.noun())]
    NotFound(AccountKind),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token issuing error.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
