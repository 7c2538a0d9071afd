//! Order repository for database operations.
//!
//! Orders are append-only apart from the status column; the conditional
//! status update here is the guard that keeps terminal states terminal even
//! under concurrent transitions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use alderwood_core::{AccountId, Email, OrderId, OrderStatus};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

const ORDER_COLUMNS: &str = "id, first_name, last_name, email, street_name, city, country, \
     postal_code, delivery_method, payment_method, total_cost, items, status, owner_id, created_at";

/// Input for creating an order row.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub street_name: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub delivery_method: String,
    pub payment_method: String,
    pub total_cost: Decimal,
    pub items: Vec<OrderItem>,
    pub owner_id: Option<AccountId>,
}

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
    street_name: String,
    city: String,
    country: String,
    postal_code: String,
    delivery_method: String,
    payment_method: String,
    total_cost: Decimal,
    items: Json<Vec<OrderItem>>,
    status: String,
    owner_id: Option<i32>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let status = row.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email,
            street_name: row.street_name,
            city: row.city,
            country: row.country,
            postal_code: row.postal_code,
            delivery_method: row.delivery_method,
            payment_method: row.payment_method,
            total_cost: row.total_cost,
            items: row.items.0,
            status,
            owner_id: row.owner_id.map(AccountId::new),
            created_at: row.created_at,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new order with status "In progress".
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO shop.customer_order
                 (first_name, last_name, email, street_name, city, country, postal_code,
                  delivery_method, payment_method, total_cost, items, owner_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&order.first_name)
        .bind(&order.last_name)
        .bind(&order.email)
        .bind(&order.street_name)
        .bind(&order.city)
        .bind(&order.country)
        .bind(&order.postal_code)
        .bind(&order.delivery_method)
        .bind(&order.payment_method)
        .bind(order.total_cost)
        .bind(Json(&order.items))
        .bind(order.owner_id)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.customer_order WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List the orders placed by one account, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any stored row is invalid.
    pub async fn list_for_owner(&self, owner: AccountId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.customer_order
             WHERE owner_id = $1 ORDER BY id ASC"
        ))
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// List every order, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any stored row is invalid.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.customer_order ORDER BY id ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Move an order out of "In progress" into a terminal state.
    ///
    /// Returns `None` when the order is missing *or* already terminal; the
    /// caller distinguishes the two with [`Self::get`]. The status predicate
    /// makes the update atomic, so two concurrent transitions cannot both
    /// succeed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn transition_from_in_progress(
        &self,
        id: OrderId,
        target: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE shop.customer_order SET status = $2
             WHERE id = $1 AND status = 'In progress'
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(target.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}
