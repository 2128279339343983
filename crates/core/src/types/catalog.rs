//! Catalog records: categories and products.
//!
//! These are read-only snapshots from the storefront's point of view.
//! The cart captures a full `Product` at add time rather than a live
//! reference, so later catalog edits never mutate an existing cart line.

use serde::{Deserialize, Serialize};

use crate::types::id::{CategoryId, ProductId};
use crate::types::price::Price;

/// A browsable product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Image path served from the static directory.
    pub image: String,
    pub description: String,
    /// Number of products in this category. Computed at catalog load,
    /// absent from the seed file.
    #[serde(default)]
    pub product_count: usize,
}

/// A single purchasable grocery item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image path served from the static directory.
    pub image: String,
    pub category: CategoryId,
    /// Unit label shown next to the price, e.g. `lb` or `each`.
    pub unit: String,
    pub description: String,
    pub in_stock: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(id: &str, price: rust_decimal::Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Test {id}"),
            price: Price::new(price),
            image: "/static/placeholder.svg".to_owned(),
            category: CategoryId::new("produce"),
            unit: "each".to_owned(),
            description: String::new(),
            in_stock: true,
        }
    }

    #[test]
    fn test_product_serde_roundtrip() {
        let original = product("p-bananas", Decimal::new(59, 2));
        let json = serde_json::to_string(&original).expect("serialize");
        let parsed: Product = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, original);
    }
}
