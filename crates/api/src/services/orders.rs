//! Order lifecycle service.
//!
//! Owns the rules the store itself does not enforce: required fields at
//! placement, ownership on customer reads, and the one-way status machine
//! `InProgress -> {Completed, Cancelled}`.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use alderwood_core::{AccountId, Email, OrderId, OrderStatus};

use crate::db::RepositoryError;
use crate::db::orders::{NewOrder, OrderRepository};
use crate::models::{Order, OrderItem};
use crate::validation::{FieldError, Validator};

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// One or more request fields failed validation.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// Order not found.
    #[error("Order not found.")]
    NotFound,

    /// The requester does not own this order.
    #[error("You do not have access to this order.")]
    NotOwner,

    /// The order is already in a terminal state.
    #[error("The order has already been closed.")]
    AlreadyClosed,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Input for placing an order.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub street_name: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub delivery_method: String,
    pub payment_method: String,
    pub total_cost: Decimal,
    pub items: Vec<OrderItem>,
}

/// Order lifecycle service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Place an order for an account.
    ///
    /// The stored order starts as "In progress" and is stamped with the
    /// current date; the customer snapshot is frozen as submitted.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` if any field is missing or the item
    /// list is empty.
    pub async fn place(
        &self,
        owner: Option<AccountId>,
        input: PlaceOrder,
    ) -> Result<Order, OrderError> {
        let email = validate_placement(&input)?;

        let order = self
            .orders
            .create(NewOrder {
                first_name: input.first_name,
                last_name: input.last_name,
                email,
                street_name: input.street_name,
                city: input.city,
                country: input.country,
                postal_code: input.postal_code,
                delivery_method: input.delivery_method,
                payment_method: input.payment_method,
                total_cost: input.total_cost,
                items: input.items,
                owner_id: owner,
            })
            .await?;

        Ok(order)
    }

    /// Get any order by ID. Administrator-side accessor; no ownership check.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if no such order exists.
    pub async fn get(&self, id: OrderId) -> Result<Order, OrderError> {
        self.orders.get(id).await?.ok_or(OrderError::NotFound)
    }

    /// Get an order on behalf of the customer who placed it.
    ///
    /// Rows without an owner predate ownership tracking and are reachable
    /// only through the administrator tree.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if no such order exists.
    /// Returns `OrderError::NotOwner` if it belongs to someone else.
    pub async fn get_owned(
        &self,
        id: OrderId,
        requester: AccountId,
    ) -> Result<Order, OrderError> {
        let order = self.orders.get(id).await?.ok_or(OrderError::NotFound)?;

        if order.owner_id != Some(requester) {
            return Err(OrderError::NotOwner);
        }

        Ok(order)
    }

    /// List the orders one account has placed; an empty list is a normal
    /// result, not an error.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_for_owner(&self, owner: AccountId) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_for_owner(owner).await?)
    }

    /// List every order in the store.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_all().await?)
    }

    /// Cancel an order, which must still be in progress.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if no such order exists.
    /// Returns `OrderError::AlreadyClosed` if it already reached a terminal state.
    pub async fn cancel(&self, id: OrderId) -> Result<Order, OrderError> {
        self.transition(id, OrderStatus::Cancelled).await
    }

    /// Complete an order, which must still be in progress.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if no such order exists.
    /// Returns `OrderError::AlreadyClosed` if it already reached a terminal state.
    pub async fn complete(&self, id: OrderId) -> Result<Order, OrderError> {
        self.transition(id, OrderStatus::Completed).await
    }

    /// Run one transition of the status machine and return the updated order.
    ///
    /// The repository update carries the `status = 'In progress'` predicate,
    /// so a concurrent transition loses cleanly instead of overwriting a
    /// terminal state.
    async fn transition(&self, id: OrderId, target: OrderStatus) -> Result<Order, OrderError> {
        debug_assert!(target.is_terminal());

        match self.orders.transition_from_in_progress(id, target).await? {
            Some(order) => Ok(order),
            // Update matched nothing: missing row or already terminal.
            None => match self.orders.get(id).await? {
                Some(_) => Err(OrderError::AlreadyClosed),
                None => Err(OrderError::NotFound),
            },
        }
    }
}

/// Validate placement fields with the messages clients expect; returns the
/// parsed snapshot email.
fn validate_placement(input: &PlaceOrder) -> Result<Email, OrderError> {
    let mut v = Validator::new();
    v.require(
        &input.first_name,
        "firstName",
        "Please enter your first name.",
    );
    v.require(&input.last_name, "lastName", "Please enter your last name.");
    v.require_email(&input.email, "email", "Please enter a valid email address.");
    v.require(
        &input.street_name,
        "streetName",
        "Please enter street address.",
    );
    v.require(&input.city, "city", "Please enter city.");
    v.require(&input.country, "country", "Please enter country.");
    v.require(
        &input.postal_code,
        "postalCode",
        "Please enter postal code.",
    );
    v.require(
        &input.delivery_method,
        "deliveryMethod",
        "Please enter delivery method.",
    );
    v.require(
        &input.payment_method,
        "paymentMethod",
        "Please enter payment method.",
    );
    v.require_non_empty(&input.items, "orderItems", "Please enter orderItems.");
    v.finish().map_err(OrderError::Validation)?;

    Email::parse(&input.email).map_err(|_| {
        OrderError::Validation(vec![FieldError::new(
            "email",
            "Please enter a valid email address.",
        )])
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn placement() -> PlaceOrder {
        PlaceOrder {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            street_name: "12 Elm Street".to_string(),
            city: "Uppsala".to_string(),
            country: "Sweden".to_string(),
            postal_code: "75310".to_string(),
            delivery_method: "courier".to_string(),
            payment_method: "card".to_string(),
            total_cost: Decimal::new(129_90, 2),
            items: vec![OrderItem {
                product: "Alder coffee table".to_string(),
                quantity: 1,
                price: Decimal::new(129_90, 2),
            }],
        }
    }

    #[test]
    fn test_valid_placement_passes() {
        assert!(validate_placement(&placement()).is_ok());
    }

    #[test]
    fn test_empty_items_rejected() {
        let mut input = placement();
        input.items.clear();

        let Err(OrderError::Validation(errors)) = validate_placement(&input) else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.first().unwrap().param, "orderItems");
    }

    #[test]
    fn test_missing_delivery_fields_rejected() {
        let mut input = placement();
        input.street_name = String::new();
        input.postal_code = "  ".to_string();

        let Err(OrderError::Validation(errors)) = validate_placement(&input) else {
            panic!("expected validation failure");
        };
        let params: Vec<_> = errors.iter().map(|e| e.param.as_str()).collect();
        assert_eq!(params, vec!["streetName", "postalCode"]);
    }

    #[test]
    fn test_bad_snapshot_email_rejected() {
        let mut input = placement();
        input.email = "nobody".to_string();

        assert!(matches!(
            validate_placement(&input),
            Err(OrderError::Validation(_))
        ));
    }
}
