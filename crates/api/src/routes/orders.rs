//! Order routes.
//!
//! Customers place, list, read and cancel their own orders; administrators
//! see everything and are the only ones who can complete. Ownership is
//! enforced here for the customer side by routing reads through
//! `OrderService::get_owned`.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use alderwood_core::{AccountKind, OrderId};

use crate::error::{AppError, Result};
use crate::middleware::auth::{RequireAccount, RequireAdmin, RequireUser};
use crate::models::{OrderItem, OrderResponse};
use crate::services::orders::{OrderError, OrderService, PlaceOrder};
use crate::state::AppState;
use crate::validation::FieldError;

/// Build the order router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", post(place_order).get(list_own_orders))
        .route("/api/orders/all", get(list_all_orders))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/cancel/{id}", patch(cancel_order))
        .route("/api/orders/complete/{id}", patch(complete_order))
}

/// Order placement request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub street_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub delivery_method: String,
    #[serde(default)]
    pub payment_method: String,
    /// Decimal-as-string, e.g. "129.90".
    #[serde(default)]
    pub total_cost: String,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
}

/// Confirmation response carrying the affected order.
#[derive(Debug, Serialize)]
pub struct OrderMessageResponse {
    pub msg: &'static str,
    pub order: OrderResponse,
}

/// `POST /api/orders` - place an order as the logged-in customer.
async fn place_order(
    RequireUser(identity): RequireUser,
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<Json<OrderMessageResponse>> {
    let total_cost = parse_total_cost(&body.total_cost)?;

    let service = OrderService::new(state.pool());
    let order = service
        .place(
            Some(identity.account_id),
            PlaceOrder {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                street_name: body.street_name,
                city: body.city,
                country: body.country,
                postal_code: body.postal_code,
                delivery_method: body.delivery_method,
                payment_method: body.payment_method,
                total_cost,
                items: body.order_items,
            },
        )
        .await?;

    Ok(Json(OrderMessageResponse {
        msg: "Your order has been placed.",
        order: order.into(),
    }))
}

/// `GET /api/orders` - the logged-in customer's orders.
///
/// An empty list is a normal, successful response.
async fn list_own_orders(
    RequireUser(identity): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderResponse>>> {
    let service = OrderService::new(state.pool());
    let orders = service.list_for_owner(identity.account_id).await?;

    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// `GET /api/orders/all` - every order in the store (administrators only).
async fn list_all_orders(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderResponse>>> {
    let service = OrderService::new(state.pool());
    let orders = service.list_all().await?;

    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// `GET /api/orders/{id}` - one order; customers only see their own.
async fn get_order(
    RequireAccount(identity): RequireAccount,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderResponse>> {
    let service = OrderService::new(state.pool());
    let id = OrderId::new(id);

    let order = match identity.kind {
        AccountKind::Administrator => service.get(id).await?,
        AccountKind::User => service.get_owned(id, identity.account_id).await?,
    };

    Ok(Json(order.into()))
}

/// `PATCH /api/orders/cancel/{id}` - cancel an in-progress order.
///
/// Customers may cancel their own orders; administrators any order.
async fn cancel_order(
    RequireAccount(identity): RequireAccount,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderMessageResponse>> {
    let service = OrderService::new(state.pool());
    let id = OrderId::new(id);

    if identity.kind == AccountKind::User {
        service
            .get_owned(id, identity.account_id)
            .await
            .map_err(transition_error)?;
    }

    let order = service.cancel(id).await.map_err(transition_error)?;

    Ok(Json(OrderMessageResponse {
        msg: "The order has been cancelled.",
        order: order.into(),
    }))
}

/// `PATCH /api/orders/complete/{id}` - mark an order completed (administrators only).
async fn complete_order(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderMessageResponse>> {
    let service = OrderService::new(state.pool());
    let order = service
        .complete(OrderId::new(id))
        .await
        .map_err(transition_error)?;

    Ok(Json(OrderMessageResponse {
        msg: "The order has been completed.",
        order: order.into(),
    }))
}

/// Transitions report a missing order as "Order not found.", unlike reads.
fn transition_error(e: OrderError) -> AppError {
    match e {
        OrderError::NotFound => AppError::NotFound("Order not found.".to_string()),
        other => other.into(),
    }
}

/// Parse the decimal-as-string total, with the validation message clients expect.
fn parse_total_cost(raw: &str) -> Result<Decimal> {
    raw.trim().parse::<Decimal>().map_err(|_| {
        AppError::Validation(vec![FieldError::new("totalCost", "Please enter totalCost.")])
    })
}
