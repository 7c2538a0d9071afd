//! HTTP route layer.
//!
//! Thin glue: each module builds the router for one capability and hands the
//! work to a service. Access control policy lives here - which extractor
//! guards which route tree - not in the services.

pub mod administrators;
pub mod emails;
pub mod orders;
pub mod products;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the full API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(users::router())
        .merge(administrators::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(emails::router())
}
