//! Bearer token issuing and verification.
//!
//! Tokens are stateless HS256 JWTs with a fixed one-hour expiry. There is no
//! refresh or rotation: an expired token means logging in again.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use alderwood_core::{AccountId, AccountKind};

/// Token lifetime in seconds.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Errors that can occur when issuing or verifying tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing failed; a server-side problem, never the client's fault.
    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    /// Bad signature, malformed payload, or elapsed expiry.
    #[error("invalid token")]
    Invalid,
}

/// The verified identity a token proves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// The account the token was issued to.
    pub account_id: AccountId,
    /// Whether the subject is a customer or an administrator.
    pub kind: AccountKind,
}

/// Signed token payload.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject account ID.
    sub: i32,
    /// Subject account kind.
    kind: AccountKind,
    /// Issued-at, seconds since the epoch.
    iat: i64,
    /// Expiry, seconds since the epoch.
    exp: i64,
}

/// Issues and verifies signed bearer tokens.
///
/// Stateless: both keys are derived once from the configured secret and the
/// service holds nothing per token.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation: Validation::default(),
        }
    }

    /// Issue a token for an account, valid for [`TOKEN_TTL_SECS`].
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if the payload cannot be signed.
    pub fn issue(&self, account_id: AccountId, kind: AccountKind) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: account_id.as_i32(),
            kind,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify a token and return the identity it proves.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if the signature is wrong, the payload
    /// is malformed, or the expiry has elapsed.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let data =
            decode::<Claims>(token, &self.decoding, &self.validation).map_err(|_| TokenError::Invalid)?;

        Ok(Identity {
            account_id: AccountId::new(data.claims.sub),
            kind: data.claims.kind,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&SecretString::from("0f1e2d3c4b5a69788796a5b4c3d2e1f0"))
    }

    #[test]
    fn test_issue_then_verify_roundtrip() {
        let tokens = service();
        let token = tokens
            .issue(AccountId::new(42), AccountKind::User)
            .unwrap();

        let identity = tokens.verify(&token).unwrap();
        assert_eq!(identity.account_id, AccountId::new(42));
        assert_eq!(identity.kind, AccountKind::User);
    }

    #[test]
    fn test_verify_preserves_kind() {
        let tokens = service();
        let token = tokens
            .issue(AccountId::new(1), AccountKind::Administrator)
            .unwrap();

        assert_eq!(
            tokens.verify(&token).unwrap().kind,
            AccountKind::Administrator
        );
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(matches!(
            service().verify("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = service()
            .issue(AccountId::new(1), AccountKind::User)
            .unwrap();

        let other = TokenService::new(&SecretString::from("ffeeddccbbaa99887766554433221100"));
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_verify_rejects_expired() {
        let tokens = service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            kind: AccountKind::User,
            iat: now - 2 * TOKEN_TTL_SECS,
            exp: now - TOKEN_TTL_SECS,
        };
        let stale = encode(&Header::default(), &claims, &tokens.encoding).unwrap();

        assert!(matches!(tokens.verify(&stale), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_verify_rejects_tampering() {
        let tokens = service();
        let token = tokens
            .issue(AccountId::new(1), AccountKind::User)
            .unwrap();

        let mut tampered = token;
        tampered.pop();
        tampered.push('A');

        assert!(tokens.verify(&tampered).is_err());
    }
}
