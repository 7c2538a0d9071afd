//! Router-level tests that need no database.
//!
//! The pool is created lazily and never connected; every request here is
//! rejected by the token guard or by validation before any query runs.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use alderwood_api::config::{ApiConfig, EmailConfig};
use alderwood_api::routes;
use alderwood_api::state::AppState;
use alderwood_core::{AccountId, AccountKind};

fn test_state() -> AppState {
    let config = ApiConfig {
        database_url: SecretString::from("postgres://localhost/alderwood_test"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        jwt_secret: SecretString::from("0f1e2d3c4b5a69788796a5b4c3d2e1f0"),
        email: EmailConfig {
            smtp_host: "smtp.test.invalid".to_string(),
            smtp_port: 587,
            smtp_username: "mailer".to_string(),
            smtp_password: SecretString::from("mailer-pass"),
            from_address: "shop@test.invalid".to_string(),
        },
        upload_dir: PathBuf::from("uploads"),
        sentry_dsn: None,
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://localhost/alderwood_test")
        .unwrap();

    AppState::new(config, pool).unwrap()
}

fn app(state: &AppState) -> Router {
    routes::router().with_state(state.clone())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let state = test_state();

    let response = app(&state)
        .oneshot(
            Request::get("/api/orders/all")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["msg"], "No token found. Access denied.");
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let state = test_state();

    let response = app(&state)
        .oneshot(
            Request::get("/api/orders/all")
                .header("auth-token", "definitely-not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(
        body["msg"],
        "Authentication failed. Please login and try again."
    );
}

#[tokio::test]
async fn test_customer_token_cannot_reach_admin_tree() {
    let state = test_state();
    let token = state
        .tokens()
        .issue(AccountId::new(1), AccountKind::User)
        .unwrap();

    let response = app(&state)
        .oneshot(
            Request::get("/api/orders/all")
                .header("auth-token", token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_token_cannot_place_orders() {
    let state = test_state();
    let token = state
        .tokens()
        .issue(AccountId::new(1), AccountKind::Administrator)
        .unwrap();

    let response = app(&state)
        .oneshot(
            Request::post("/api/orders")
                .header("auth-token", token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_registration_validation_reports_every_field() {
    let state = test_state();

    let response = app(&state)
        .oneshot(
            Request::post("/api/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let errors = body["errors"].as_array().unwrap();
    let params: Vec<_> = errors.iter().map(|e| e["param"].as_str().unwrap()).collect();
    assert_eq!(params, vec!["firstName", "lastName", "email", "password"]);
}

#[tokio::test]
async fn test_newsletter_signup_validates_email() {
    let state = test_state();

    let response = app(&state)
        .oneshot(
            Request::post("/api/emails/newsletter-signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "emailId": "not-an-email" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["param"], "emailId");
    assert_eq!(body["errors"][0]["msg"], "Please enter a valid email address.");
}

#[tokio::test]
async fn test_unknown_reset_audience_is_not_found() {
    let state = test_state();

    let response = app(&state)
        .oneshot(
            Request::post("/api/emails/reset-password/root")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "emailId": "a@b.com" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["msg"], "Not found.");
}

#[tokio::test]
async fn test_short_reset_password_is_rejected_before_token_lookup() {
    let state = test_state();

    let response = app(&state)
        .oneshot(
            Request::patch("/api/emails/update-password/user/abc123")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "password": "1234567" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["param"], "password");
}
