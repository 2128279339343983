//! The shopping cart aggregate.
//!
//! A cart is an ordered list of line items, one per distinct product.
//! All mutation goes through the methods here so the two structural
//! invariants hold at every observable point:
//!
//! - product ids are unique across line items
//! - every stored quantity is at least 1
//!
//! Totals are recomputed from the line items on every read; nothing is
//! cached, so they can never go stale.

use serde::{Deserialize, Serialize};

use crate::types::catalog::Product;
use crate::types::id::ProductId;
use crate::types::price::Price;

/// One row in the cart: a product snapshot and the requested quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Snapshot captured when the product was first added.
    pub product: Product,
    /// Always >= 1 for a stored line.
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The cart for one client session.
///
/// Line items keep the order in which their products were first added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The line items, in first-added order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line item for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product.id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of `product`.
    ///
    /// If a line for the product already exists its quantity is
    /// incremented; otherwise a new line with quantity 1 is appended.
    pub fn add(&mut self, product: &Product) {
        match self
            .lines
            .iter_mut()
            .find(|line| line.product.id == product.id)
        {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            }),
        }
    }

    /// Set the quantity for `product_id`.
    ///
    /// A quantity of zero or less removes the line outright; this is the
    /// only way a quantity can leave the >= 1 range, and the caller is
    /// not told the line went away. Unknown ids are a no-op.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i32) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        #[allow(clippy::cast_sign_loss)]
        let quantity = quantity as u32;
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| &line.product.id == product_id)
        {
            line.quantity = quantity;
        }
    }

    /// Remove the line for `product_id`. No-op when absent.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.lines.retain(|line| &line.product.id != product_id);
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all line quantities; 0 for an empty cart.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Restore the structural invariants after deserializing an
    /// untrusted snapshot: zero-quantity lines are dropped and only the
    /// first line per product id is kept.
    pub fn sanitize(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.lines
            .retain(|line| line.quantity >= 1 && seen.insert(line.product.id.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::id::CategoryId;
    use rust_decimal::Decimal;

    fn product(id: &str, price: Decimal) -> Product {
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
    fn test_empty_cart_totals_are_zero() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.subtotal(), Price::ZERO);
    }

    #[test]
    fn test_repeated_adds_keep_one_line() {
        let mut cart = Cart::new();
        let apples = product("p-apples", Decimal::new(120, 2));
        for _ in 0..5 {
            cart.add(&apples);
        }

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(&apples.id).map(|l| l.quantity), Some(5));
        assert_eq!(cart.total_items(), 5);
    }

    #[test]
    fn test_lines_keep_first_added_order() {
        let mut cart = Cart::new();
        let first = product("p-milk", Decimal::new(399, 2));
        let second = product("p-bread", Decimal::new(249, 2));
        cart.add(&first);
        cart.add(&second);
        cart.add(&first);

        let ids: Vec<&str> = cart
            .lines()
            .iter()
            .map(|line| line.product.id.as_str())
            .collect();
        assert_eq!(ids, ["p-milk", "p-bread"]);
    }

    #[test]
    fn test_set_quantity_sets_exact_value_and_is_idempotent() {
        let mut cart = Cart::new();
        let eggs = product("p-eggs", Decimal::new(450, 2));
        cart.add(&eggs);

        cart.set_quantity(&eggs.id, 7);
        cart.set_quantity(&eggs.id, 7);
        assert_eq!(cart.line(&eggs.id).map(|l| l.quantity), Some(7));
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes_line() {
        let mut cart = Cart::new();
        let eggs = product("p-eggs", Decimal::new(450, 2));

        cart.add(&eggs);
        cart.set_quantity(&eggs.id, 0);
        assert!(cart.is_empty());

        cart.add(&eggs);
        cart.set_quantity(&eggs.id, -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product("p-eggs", Decimal::new(450, 2)));
        cart.set_quantity(&ProductId::new("p-missing"), 3);

        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product("p-eggs", Decimal::new(450, 2)));
        cart.remove(&ProductId::new("p-missing"));

        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_totals_track_adds_and_quantity_updates() {
        // One item priced $3.50 at quantity 2, then a third unit, then
        // an update back to zero.
        let mut cart = Cart::new();
        let salmon = product("p-salmon", Decimal::new(350, 2));

        cart.add(&salmon);
        cart.add(&salmon);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.subtotal(), Price::new(Decimal::new(700, 2)));

        cart.add(&salmon);
        assert_eq!(cart.line(&salmon.id).map(|l| l.quantity), Some(3));
        assert_eq!(cart.subtotal(), Price::new(Decimal::new(1050, 2)));

        cart.set_quantity(&salmon.id, 0);
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Price::ZERO);
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut cart = Cart::new();
        cart.add(&product("p-milk", Decimal::new(399, 2)));
        cart.add(&product("p-bread", Decimal::new(249, 2)));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.subtotal(), Price::ZERO);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut cart = Cart::new();
        cart.add(&product("p-milk", Decimal::new(399, 2)));
        cart.add(&product("p-bread", Decimal::new(249, 2)));
        cart.set_quantity(&ProductId::new("p-bread"), 4);

        let json = serde_json::to_string(&cart).expect("serialize");
        let parsed: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, cart);
    }

    #[test]
    fn test_sanitize_drops_invalid_lines() {
        let mut cart = Cart::new();
        let milk = product("p-milk", Decimal::new(399, 2));
        cart.lines = vec![
            CartLine {
                product: milk.clone(),
                quantity: 2,
            },
            CartLine {
                product: product("p-bread", Decimal::new(249, 2)),
                quantity: 0,
            },
            CartLine {
                product: milk.clone(),
                quantity: 9,
            },
        ];

        cart.sanitize();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(&milk.id).map(|l| l.quantity), Some(2));
    }
}
