//! Account domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use alderwood_core::{AccountId, AccountKind, Email};

/// A customer or administrator account (domain type).
///
/// The password hash never travels with this type; the repository exposes it
/// only to the login path.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Whether this is a customer or an administrator.
    pub kind: AccountKind,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address, unique per account kind.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Client-facing account projection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            id: AccountId::new(1),
            kind: AccountKind::User,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_response_uses_camel_case() {
        let json = serde_json::to_value(AccountResponse::from(account())).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["lastName"], "Lovelace");
        assert_eq!(json["email"], "ada@example.com");
    }

    #[test]
    fn test_response_never_carries_password_material() {
        let json = serde_json::to_string(&AccountResponse::from(account())).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
    }
}
