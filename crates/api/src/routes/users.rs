//! Customer account routes.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use alderwood_core::AccountKind;

use crate::error::Result;
use crate::middleware::auth::RequireUser;
use crate::models::AccountResponse;
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

/// Build the customer account router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(register).patch(update_profile))
        .route("/api/users/login", post(login))
        .route("/api/users/profile", get(profile))
}

/// Registration request body.
///
/// Fields default to empty so a missing field surfaces as a validation
/// message rather than a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Profile edit request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Response carrying a freshly issued bearer token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `POST /api/users` - register a customer account.
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens());

    let token = auth
        .register(
            AccountKind::User,
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

/// `POST /api/users/login` - authenticate a customer and get a token.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let token = auth
        .login(AccountKind::User, &body.email, &body.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// `GET /api/users/profile` - the logged-in customer's account.
async fn profile(
    RequireUser(identity): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<AccountResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let account = auth.profile(identity).await?;

    Ok(Json(account.into()))
}

/// `PATCH /api/users` - edit the logged-in customer's name.
async fn update_profile(
    RequireUser(identity): RequireUser,
    State(state): State<AppState>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<AccountResponse>> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let account = auth
        .update_profile(identity, &body.first_name, &body.last_name)
        .await?;

    Ok(Json(account.into()))
}
