//! Password reset flow.
//!
//! A reset request stores an opaque random token with a one-hour expiry and
//! emails a link carrying it; completing the reset consumes the token. The
//! new password is hashed only after the token is confirmed valid.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use thiserror::Error;

use alderwood_core::{AccountKind, Email};

use crate::db::RepositoryError;
use crate::db::accounts::AccountRepository;
use crate::services::auth::hash_password;
use crate::services::email::{EmailError, EmailService, generate_reset_token};
use crate::validation::{FieldError, Validator};

/// How long a reset token stays valid.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Minimum length of the replacement password.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during the password reset flow.
#[derive(Debug, Error)]
pub enum PasswordResetError {
    /// One or more request fields failed validation.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// No account of this kind has the given email.
    ///
    /// Deliberately distinct from the generic auth errors: the original
    /// surface exposes "not found" on reset requests, and clients depend on
    /// it. See DESIGN.md.
    #[error("account not found")]
    AccountNotFound(AccountKind),

    /// The token matches no account, or its expiry has elapsed.
    #[error("invalid or expired reset token")]
    InvalidOrExpiredToken(AccountKind),

    /// Password hashing error.
    #[error("password hashing error")]
    Hash,

    /// Email delivery error.
    #[error("email error: {0}")]
    Email(#[from] EmailError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Password reset service.
pub struct PasswordResetService<'a> {
    accounts: AccountRepository<'a>,
    mailer: &'a EmailService,
    base_url: &'a str,
}

impl<'a> PasswordResetService<'a> {
    /// Create a new password reset service.
    ///
    /// `base_url` is the public frontend URL reset links point into.
    #[must_use]
    pub const fn new(pool: &'a PgPool, mailer: &'a EmailService, base_url: &'a str) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
            mailer,
            base_url,
        }
    }

    /// Start a reset: store a fresh token and email the link.
    ///
    /// The HTTP response waits for the delivery attempt; there is no retry
    /// on transient SMTP failure.
    ///
    /// # Errors
    ///
    /// Returns `PasswordResetError::Validation` if the email is malformed.
    /// Returns `PasswordResetError::AccountNotFound` if no account matches.
    pub async fn request(
        &self,
        kind: AccountKind,
        email: &str,
    ) -> Result<(), PasswordResetError> {
        let mut v = Validator::new();
        v.require_email(email, "emailId", "Please enter a valid email address.");
        v.finish().map_err(PasswordResetError::Validation)?;

        let email = Email::parse(email)
            .map_err(|_| PasswordResetError::AccountNotFound(kind))?;

        if self.accounts.get_by_email(kind, &email).await?.is_none() {
            return Err(PasswordResetError::AccountNotFound(kind));
        }

        let token = generate_reset_token();
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);

        self.accounts
            .set_reset_token(kind, &email, &token, expires_at)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => PasswordResetError::AccountNotFound(kind),
                other => PasswordResetError::Repository(other),
            })?;

        let reset_link = format!(
            "{}/reset-password/{token}",
            self.base_url.trim_end_matches('/')
        );
        self.mailer
            .send_password_reset(email.as_str(), &reset_link)
            .await?;

        tracing::info!(kind = %kind, "Password reset requested");
        Ok(())
    }

    /// Complete a reset: consume the token and store the new password.
    ///
    /// # Errors
    ///
    /// Returns `PasswordResetError::Validation` if the new password is too short.
    /// Returns `PasswordResetError::InvalidOrExpiredToken` if the token
    /// matches nothing or has expired - including a token that was already
    /// used once, since completing clears it.
    pub async fn complete(
        &self,
        kind: AccountKind,
        token: &str,
        new_password: &str,
    ) -> Result<(), PasswordResetError> {
        let mut v = Validator::new();
        v.require_min_len(
            new_password,
            MIN_PASSWORD_LENGTH,
            "password",
            "Please enter a password with at least 8 characters.",
        );
        v.finish().map_err(PasswordResetError::Validation)?;

        // Find the account first; hashing is wasted work on a dead token.
        let account = self
            .accounts
            .get_by_valid_reset_token(kind, token)
            .await?
            .ok_or(PasswordResetError::InvalidOrExpiredToken(kind))?;

        let password_hash =
            hash_password(new_password).map_err(|_| PasswordResetError::Hash)?;

        self.accounts
            .set_password_and_clear_reset_token(account.id, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => PasswordResetError::InvalidOrExpiredToken(kind),
                other => PasswordResetError::Repository(other),
            })?;

        tracing::info!(kind = %kind, account = %account.id, "Password reset completed");
        Ok(())
    }
}
