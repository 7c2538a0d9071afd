//! Transactional email routes.
//!
//! Newsletter signup plus the two-step password reset flow, each available
//! to both account audiences. The response is sent after the delivery
//! attempt finishes; a transient SMTP failure surfaces to the client instead
//! of being retried.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{patch, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

use alderwood_core::AccountKind;

use crate::error::{AppError, Result};
use crate::services::password_reset::PasswordResetService;
use crate::state::AppState;
use crate::validation::Validator;

/// Build the email router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/emails/newsletter-signup", post(newsletter_signup))
        .route(
            "/api/emails/reset-password/{audience}",
            post(request_password_reset),
        )
        .route(
            "/api/emails/update-password/{audience}/{token}",
            patch(update_password),
        )
}

/// Request body carrying the recipient address.
///
/// The field is `emailId` for wire compatibility.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailIdRequest {
    #[serde(default)]
    pub email_id: String,
}

/// Request body carrying the replacement password.
#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    #[serde(default)]
    pub password: String,
}

/// Map the `{user|admin}` path segment onto an account kind.
fn parse_audience(audience: &str) -> Result<AccountKind> {
    match audience {
        "user" => Ok(AccountKind::User),
        "admin" => Ok(AccountKind::Administrator),
        _ => Err(AppError::NotFound("Not found.".to_string())),
    }
}

/// `POST /api/emails/newsletter-signup` - send the newsletter welcome email.
async fn newsletter_signup(
    State(state): State<AppState>,
    Json(body): Json<EmailIdRequest>,
) -> Result<Json<Value>> {
    let mut v = Validator::new();
    v.require_email(
        &body.email_id,
        "emailId",
        "Please enter a valid email address.",
    );
    v.finish().map_err(AppError::Validation)?;

    state
        .mailer()
        .send_newsletter_welcome(&body.email_id)
        .await?;

    Ok(Json(
        json!({ "msg": "The newsletter signup email has been sent." }),
    ))
}

/// `POST /api/emails/reset-password/{user|admin}` - start a password reset.
async fn request_password_reset(
    State(state): State<AppState>,
    Path(audience): Path<String>,
    Json(body): Json<EmailIdRequest>,
) -> Result<Json<Value>> {
    let kind = parse_audience(&audience)?;

    let service =
        PasswordResetService::new(state.pool(), state.mailer(), &state.config().base_url);
    service.request(kind, &body.email_id).await?;

    Ok(Json(
        json!({ "msg": "The password reset email has been sent." }),
    ))
}

/// `PATCH /api/emails/update-password/{user|admin}/{token}` - finish a
/// password reset by consuming the emailed token.
async fn update_password(
    State(state): State<AppState>,
    Path((audience, token)): Path<(String, String)>,
    Json(body): Json<UpdatePasswordRequest>,
) -> Result<Json<Value>> {
    let kind = parse_audience(&audience)?;

    let service =
        PasswordResetService::new(state.pool(), state.mailer(), &state.config().base_url);
    service.complete(kind, &token, &body.password).await?;

    Ok(Json(json!({ "msg": "Password changed successfully." })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_audience() {
        assert!(matches!(parse_audience("user"), Ok(AccountKind::User)));
        assert!(matches!(
            parse_audience("admin"),
            Ok(AccountKind::Administrator)
        ));
        assert!(parse_audience("root").is_err());
    }
}
