//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use alderwood_core::{AccountId, Email, OrderId, OrderStatus};

/// One line of an order.
///
/// Snapshot data; a later product edit never changes a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product name at placement time.
    pub product: String,
    /// Number of units ordered.
    pub quantity: u32,
    /// Unit price at placement time.
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// A placed order (domain type).
///
/// The customer snapshot and line items are immutable after placement; only
/// `status` changes, through explicit transitions.
#[derive(Debug, Clone)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Customer given name at placement time.
    pub first_name: String,
    /// Customer family name at placement time.
    pub last_name: String,
    /// Customer email at placement time (not live-linked to the account).
    pub email: Email,
    /// Delivery street address.
    pub street_name: String,
    /// Delivery city.
    pub city: String,
    /// Delivery country.
    pub country: String,
    /// Delivery postal code.
    pub postal_code: String,
    /// Chosen delivery method.
    pub delivery_method: String,
    /// Chosen payment method.
    pub payment_method: String,
    /// Order total.
    pub total_cost: Decimal,
    /// Line items, in the order the customer added them.
    pub items: Vec<OrderItem>,
    /// Lifecycle state.
    pub status: OrderStatus,
    /// Account that placed the order; absent on historical rows.
    pub owner_id: Option<AccountId>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Placement date in the day/month/year form clients display.
    #[must_use]
    pub fn date(&self) -> String {
        self.created_at.format("%-d/%-m/%Y").to_string()
    }
}

/// Client-facing order projection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: OrderId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub street_name: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
    pub delivery_method: String,
    pub payment_method: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_cost: Decimal,
    pub order_items: Vec<OrderItem>,
    pub date: String,
    pub status: OrderStatus,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let date = order.date();
        Self {
            id: order.id,
            first_name: order.first_name,
            last_name: order.last_name,
            email: order.email,
            street_name: order.street_name,
            city: order.city,
            country: order.country,
            postal_code: order.postal_code,
            delivery_method: order.delivery_method,
            payment_method: order.payment_method,
            total_cost: order.total_cost,
            order_items: order.items,
            date,
            status: order.status,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn order() -> Order {
        Order {
            id: OrderId::new(1),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
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
            status: OrderStatus::InProgress,
            owner_id: Some(AccountId::new(7)),
            created_at: Utc.with_ymd_and_hms(2026, 3, 5, 14, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_date_has_no_zero_padding() {
        assert_eq!(order().date(), "5/3/2026");
    }

    #[test]
    fn test_response_serializes_total_as_string() {
        let json = serde_json::to_value(OrderResponse::from(order())).unwrap();
        assert_eq!(json["totalCost"], "129.90");
        assert_eq!(json["status"], "In progress");
        assert_eq!(json["date"], "5/3/2026");
    }

    #[test]
    fn test_response_keeps_item_order() {
        let mut o = order();
        o.items = vec![
            OrderItem {
                product: "Bookshelf".to_string(),
                quantity: 2,
                price: Decimal::new(89_00, 2),
            },
            OrderItem {
                product: "Reading lamp".to_string(),
                quantity: 1,
                price: Decimal::new(35_50, 2),
            },
        ];

        let json = serde_json::to_value(OrderResponse::from(o)).unwrap();
        assert_eq!(json["orderItems"][0]["product"], "Bookshelf");
        assert_eq!(json["orderItems"][1]["product"], "Reading lamp");
    }

    #[test]
    fn test_item_price_roundtrips_as_string() {
        let item = OrderItem {
            product: "Oak stool".to_string(),
            quantity: 3,
            price: Decimal::new(45_00, 2),
        };

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"45.00\""));

        let parsed: OrderItem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, item);
    }
}
