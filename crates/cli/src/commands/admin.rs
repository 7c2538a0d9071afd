//! Administrator account management commands.
//!
//! # Usage
//!
//! ```bash
//! alderwood-cli admin create -e admin@example.com -f Ada -l Lovelace -p 'a strong password'
//! ```
//!
//! # Environment Variables
//!
//! - `SHOP_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use secrecy::ExposeSecret;
use sqlx::PgPool;

use alderwood_api::db::accounts::AccountRepository;
use alderwood_api::services::auth::hash_password;
use alderwood_core::{AccountKind, Email};

use super::{CliError, database_url};

/// Minimum password length, matching the server's registration rule.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Create a new administrator account.
///
/// # Errors
///
/// Returns `CliError::InvalidInput` if the email or password is invalid, or
/// if the email is already registered as an administrator.
pub async fn create(
    email: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
) -> Result<(), CliError> {
    let email = Email::parse(email)
        .map_err(|e| CliError::InvalidInput(format!("Invalid email: {e}")))?;

    if first_name.trim().is_empty() || last_name.trim().is_empty() {
        return Err(CliError::InvalidInput(
            "First and last name must not be empty".to_string(),
        ));
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CliError::InvalidInput(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let password_hash = hash_password(password)
        .map_err(|_| CliError::InvalidInput("Failed to hash password".to_string()))?;

    let database_url = database_url()?;
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let repository = AccountRepository::new(&pool);
    let account = repository
        .create(
            AccountKind::Administrator,
            first_name.trim(),
            last_name.trim(),
            &email,
            &password_hash,
        )
        .await
        .map_err(|e| match e {
            alderwood_api::db::RepositoryError::Conflict(_) => CliError::InvalidInput(format!(
                "Administrator already exists with email: {email}"
            )),
            other => CliError::InvalidInput(other.to_string()),
        })?;

    tracing::info!(id = %account.id, email = %account.email, "Administrator account created");
    Ok(())
}
