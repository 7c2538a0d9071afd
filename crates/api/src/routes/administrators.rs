//! Administrator account routes.
//!
//! Same credential flow as customers against the administrator kind; the
//! admin-only store operations live in the product and order routers behind
//! `RequireAdmin`.

use axum::{Json, Router, extract::State, routing::post};

use alderwood_core::AccountKind;

use crate::error::Result;
use crate::routes::users::{LoginRequest, RegisterRequest, TokenResponse};
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

/// Build the administrator account router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/administrator/register", post(register))
        .route("/api/administrator/login", post(login))
}

/// `POST /api/administrator/register` - register an administrator account.
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens());

    let token = auth
        .register(
            AccountKind::Administrator,
            Registration {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                password: body.password,
            },
        )
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// `POST /api/administrator/login` - authenticate an administrator.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let token = auth
        .login(AccountKind::Administrator, &body.email, &body.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}
