//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use alderwood_core::ProductId;

/// A catalog product (domain type).
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name, unique across the catalog.
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// Path of the stored product image, served under `/uploads`.
    pub image: String,
    /// Units in stock.
    pub quantity: i32,
    /// Unit price.
    pub price: Decimal,
    /// Optional display rating.
    pub rating: Option<String>,
    /// Categories the product is listed under.
    pub category: Vec<String>,
    /// When the product was added.
    pub created_at: DateTime<Utc>,
}

/// Client-facing product projection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    pub category: Vec<String>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            image: product.image,
            quantity: product.quantity,
            price: product.price,
            rating: product.rating,
            category: product.category,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_response_serializes_price_as_string() {
        let product = Product {
            id: ProductId::new(1),
            name: "Alder coffee table".to_string(),
            description: "Solid alder, oiled finish.".to_string(),
            image: "uploads/image-1.png".to_string(),
            quantity: 4,
            price: Decimal::new(129_90, 2),
            rating: None,
            category: vec!["tables".to_string()],
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(ProductResponse::from(product)).unwrap();
        assert_eq!(json["price"], "129.90");
        assert_eq!(json["category"][0], "tables");
        // rating is omitted when absent
        assert!(json.get("rating").is_none());
    }
}
