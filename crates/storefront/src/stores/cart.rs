//! The cart store: authoritative line items plus derived totals.

use freshmart_core::{Cart, Price, Product, ProductId};

use super::kv::KeyValueStore;

/// Storage key for the serialized cart.
pub const CART_KEY: &str = "cart_v1";

/// Owns the cart for one client and persists it after every mutation.
///
/// The in-memory [`Cart`] is the source of truth; the backing store is a
/// best-effort durable copy. A write failure is logged and swallowed, so
/// the shopper keeps a working cart even when storage is unavailable.
pub struct CartStore<S> {
    store: S,
    cart: Cart,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Rehydrate the cart from `store`.
    ///
    /// Missing or malformed snapshots start an empty cart; snapshots
    /// that parse but violate the cart invariants are sanitized rather
    /// than exposed.
    pub fn open(store: S) -> Self {
        let cart = store
            .get(CART_KEY)
            .and_then(|raw| match serde_json::from_str::<Cart>(&raw) {
                Ok(cart) => Some(cart),
                Err(e) => {
                    tracing::warn!("discarding unreadable cart snapshot: {e}");
                    None
                }
            })
            .map(|mut cart| {
                cart.sanitize();
                cart
            })
            .unwrap_or_default();

        Self { store, cart }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.cart.total_items()
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.cart.subtotal()
    }

    /// Add one unit of `product`, then persist.
    pub fn add_to_cart(&mut self, product: &Product) {
        self.cart.add(product);
        self.persist();
    }

    /// Set the quantity for `product_id`, then persist.
    ///
    /// Quantities of zero or less remove the line (see
    /// [`Cart::set_quantity`]); unknown ids are a no-op but the current
    /// state is still persisted.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i32) {
        self.cart.set_quantity(product_id, quantity);
        self.persist();
    }

    /// Remove the line for `product_id`, then persist.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) {
        self.cart.remove(product_id);
        self.persist();
    }

    /// Empty the cart, then persist the empty snapshot.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// Write the current cart to the backing store, best-effort.
    fn persist(&self) {
        match serde_json::to_string(&self.cart) {
            Ok(raw) => {
                if let Err(e) = self.store.put(CART_KEY, &raw) {
                    tracing::warn!("cart snapshot not persisted: {e}");
                }
            }
            Err(e) => tracing::warn!("cart snapshot not serialized: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::kv::test_support::RejectingStore;
    use crate::stores::kv::MemoryStore;
    use freshmart_core::CategoryId;
    use rust_decimal::Decimal;

    fn product(id: &str, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Test {id}"),
            price: freshmart_core::Price::new(price),
            image: "/static/placeholder.svg".to_owned(),
            category: CategoryId::new("produce"),
            unit: "each".to_owned(),
            description: String::new(),
            in_stock: true,
        }
    }

    #[test]
    fn test_mutations_survive_reopen() {
        let backend = MemoryStore::new();

        let mut store = CartStore::open(backend.clone());
        store.add_to_cart(&product("p-milk", Decimal::new(399, 2)));
        store.add_to_cart(&product("p-milk", Decimal::new(399, 2)));
        store.add_to_cart(&product("p-bread", Decimal::new(249, 2)));
        drop(store);

        let reopened = CartStore::open(backend);
        assert_eq!(reopened.total_items(), 3);
        assert_eq!(reopened.total_price(), Price::new(Decimal::new(1047, 2)));
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty() {
        let backend = MemoryStore::new();
        backend.put(CART_KEY, "{not json").expect("write");

        let store = CartStore::open(backend);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_tampered_snapshot_is_sanitized() {
        let backend = MemoryStore::new();
        let raw = serde_json::json!([
            {"product": product("p-milk", Decimal::new(399, 2)), "quantity": 2},
            {"product": product("p-bread", Decimal::new(249, 2)), "quantity": 0}
        ]);
        backend
            .put(CART_KEY, &raw.to_string())
            .expect("write");

        let store = CartStore::open(backend);
        assert_eq!(store.cart().lines().len(), 1);
        assert_eq!(store.total_items(), 2);
    }

    #[test]
    fn test_write_failures_keep_memory_state() {
        let mut store = CartStore::open(RejectingStore);
        store.add_to_cart(&product("p-milk", Decimal::new(399, 2)));
        store.update_quantity(&ProductId::new("p-milk"), 4);

        assert_eq!(store.total_items(), 4);
        assert_eq!(store.total_price(), Price::new(Decimal::new(1596, 2)));
    }

    #[test]
    fn test_clear_persists_empty_snapshot() {
        let backend = MemoryStore::new();

        let mut store = CartStore::open(backend.clone());
        store.add_to_cart(&product("p-milk", Decimal::new(399, 2)));
        store.clear_cart();

        assert_eq!(backend.get(CART_KEY).as_deref(), Some("[]"));
        assert!(CartStore::open(backend).cart().is_empty());
    }
}
