//! Authentication extractors.
//!
//! The token guard is a capability check, not a capability grant: it only
//! establishes *who* is calling. Whether that identity may touch a given
//! order or product is decided by the services behind the route.
//!
//! Clients present the token in a custom `auth-token` header rather than the
//! standard `Authorization` scheme.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use alderwood_core::AccountKind;

use crate::services::token::Identity;
use crate::state::AppState;

/// Header carrying the bearer token.
pub const AUTH_TOKEN_HEADER: &str = "auth-token";

/// Error returned when a request fails the token guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// The `auth-token` header is absent.
    MissingToken,
    /// The header is present but the token does not verify.
    InvalidToken,
    /// The token is valid but proves the wrong account kind for this route.
    WrongKind,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            Self::MissingToken => (StatusCode::UNAUTHORIZED, "No token found. Access denied."),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Authentication failed. Please login and try again.",
            ),
            Self::WrongKind => (
                StatusCode::FORBIDDEN,
                "You do not have permission to access this resource.",
            ),
        };

        (status, Json(json!({ "msg": msg }))).into_response()
    }
}

/// Read and verify the token header, yielding the identity it proves.
fn authenticate(parts: &Parts, state: &AppState) -> Result<Identity, AuthRejection> {
    let token = parts
        .headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthRejection::MissingToken)?;

    state
        .tokens()
        .verify(token)
        .map_err(|_| AuthRejection::InvalidToken)
}

/// Extractor that requires a valid token from a customer account.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireUser(identity): RequireUser) -> impl IntoResponse {
///     format!("account {}", identity.account_id)
/// }
/// ```
pub struct RequireUser(pub Identity);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = authenticate(parts, state)?;

        if identity.kind != AccountKind::User {
            return Err(AuthRejection::WrongKind);
        }

        Ok(Self(identity))
    }
}

/// Extractor that requires a valid token from an administrator account.
pub struct RequireAdmin(pub Identity);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = authenticate(parts, state)?;

        if identity.kind != AccountKind::Administrator {
            return Err(AuthRejection::WrongKind);
        }

        Ok(Self(identity))
    }
}

/// Extractor that requires a valid token of either kind.
///
/// Used on routes shared by customers and administrators (order read and
/// cancel); the handler decides what each kind may do with it.
pub struct RequireAccount(pub Identity);

impl FromRequestParts<AppState> for RequireAccount {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(authenticate(parts, state)?))
    }
}
