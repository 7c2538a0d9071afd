//! Authentication service.
//!
//! Registration, login and profile management for both account kinds. The
//! kind always comes from the route tree (or a verified token), never from
//! the request body.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use alderwood_core::{AccountKind, Email};

use crate::db::RepositoryError;
use crate::db::accounts::AccountRepository;
use crate::models::Account;
use crate::services::token::{Identity, TokenService};
use crate::validation::{FieldError, Validator};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration input, field names matching the request body.
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Authentication service.
///
/// Handles account registration, login, and profile updates.
pub struct AuthService<'a> {
    accounts: AccountRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenService) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
            tokens,
        }
    }

    /// Register a new account and issue a bearer token for it.
    ///
    /// The duplicate pre-check only exists for the friendly message; the
    /// store's unique index is the real guard, and a lost race maps to the
    /// same error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if any field is missing or malformed.
    /// Returns `AuthError::AlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        kind: AccountKind,
        input: Registration,
    ) -> Result<String, AuthError> {
        validate_registration(&input)?;

        // The validator already confirmed the shape
        let email = Email::parse(&input.email).map_err(|_| {
            AuthError::Validation(vec![FieldError::new(
                "email",
                "Please enter a valid email address.",
            )])
        })?;

        if self.accounts.get_by_email(kind, &email).await?.is_some() {
            return Err(AuthError::AlreadyExists(kind));
        }

        let password_hash = hash_password(&input.password)?;

        let account = self
            .accounts
            .create(
                kind,
                input.first_name.trim(),
                input.last_name.trim(),
                &email,
                &password_hash,
            )
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AlreadyExists(kind),
                other => AuthError::Repository(other),
            })?;

        Ok(self.tokens.issue(account.id, kind)?)
    }

    /// Log in with email and password, issuing a fresh token.
    ///
    /// # Errors
    ///
    /// Returns the same `AuthError::InvalidCredentials` whether the account
    /// does not exist or the password is wrong - no enumeration oracle.
    pub async fn login(
        &self,
        kind: AccountKind,
        email: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        let mut v = Validator::new();
        v.require_email(email, "email", "Please enter a valid email.");
        v.require(password, "password", "Please enter a password.");
        v.finish().map_err(AuthError::Validation)?;

        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (account, password_hash) = self
            .accounts
            .get_password_hash(kind, &email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(self.tokens.issue(account.id, kind)?)
    }

    /// Fetch the account behind a verified identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotFound` if the account no longer exists.
    pub async fn profile(&self, identity: Identity) -> Result<Account, AuthError> {
        self.accounts
            .get_by_id(identity.kind, identity.account_id)
            .await?
            .ok_or(AuthError::NotFound(identity.kind))
    }

    /// Update the name fields of an account. Nothing else is editable here.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if either name is empty.
    /// Returns `AuthError::NotFound` if the account no longer exists.
    pub async fn update_profile(
        &self,
        identity: Identity,
        first_name: &str,
        last_name: &str,
    ) -> Result<Account, AuthError> {
        let mut v = Validator::new();
        v.require(first_name, "firstName", "Please enter your first name.");
        v.require(last_name, "lastName", "Please enter your last name.");
        v.finish().map_err(AuthError::Validation)?;

        self.accounts
            .update_name(
                identity.kind,
                identity.account_id,
                first_name.trim(),
                last_name.trim(),
            )
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::NotFound(identity.kind),
                other => AuthError::Repository(other),
            })
    }
}

/// Validate registration fields with the messages clients expect.
fn validate_registration(input: &Registration) -> Result<(), AuthError> {
    let mut v = Validator::new();
    v.require(
        &input.first_name,
        "firstName",
        "Please enter your first name.",
    );
    v.require(&input.last_name, "lastName", "Please enter your last name.");
    v.require_email(&input.email, "email", "Please enter a valid email address.");
    v.require_min_len(
        &input.password,
        MIN_PASSWORD_LENGTH,
        "password",
        "Please enter a password with at least 8 characters.",
    );
    v.finish().map_err(AuthError::Validation)
}

/// Hash a password using Argon2id.
///
/// Public so operational tooling (the CLI's `admin create`) hashes the same
/// way the server does.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registration(password: &str) -> Registration {
        Registration {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_password_boundary() {
        // exactly 7 characters rejected, exactly 8 accepted
        assert!(validate_registration(&registration("1234567")).is_err());
        assert!(validate_registration(&registration("12345678")).is_ok());
    }

    #[test]
    fn test_registration_collects_all_failures() {
        let input = Registration {
            first_name: String::new(),
            last_name: String::new(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };

        let Err(AuthError::Validation(errors)) = validate_registration(&input) else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(matches!(
            verify_password("incorrect horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_raw_password_never_in_hash() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(!hash.contains("hunter2"));
    }
}
