//! The usage tracker: accumulated category interest scores.

use freshmart_core::{CategoryId, UsageMap};

use super::kv::KeyValueStore;

/// Storage key for the serialized usage map.
pub const USAGE_KEY: &str = "category_usage_v1";

/// Score weights recorded by the storefront, ordered by how strongly the
/// event signals purchase intent.
pub mod weights {
    /// A category tile click on the home or categories page.
    pub const TILE_CLICK: u32 = 1;
    /// A visit to a category's product listing.
    pub const CATEGORY_VISIT: u32 = 2;
    /// An add-to-cart from inside a category.
    pub const CART_ADD: u32 = 3;
}

/// Owns the usage map for one client and persists it after every write.
///
/// Follows the same best-effort persistence policy as
/// [`CartStore`](super::CartStore): unreadable snapshots degrade to an
/// empty map, failed writes are logged and swallowed.
pub struct UsageTracker<S> {
    store: S,
    map: UsageMap,
}

impl<S: KeyValueStore> UsageTracker<S> {
    /// Rehydrate the usage map from `store`.
    pub fn open(store: S) -> Self {
        let map = store
            .get(USAGE_KEY)
            .and_then(|raw| match serde_json::from_str::<UsageMap>(&raw) {
                Ok(map) => Some(map),
                Err(e) => {
                    tracing::warn!("discarding unreadable usage snapshot: {e}");
                    None
                }
            })
            .unwrap_or_default();

        Self { store, map }
    }

    /// Add `amount` to the score for `category_id`, then persist.
    ///
    /// An empty category id is a no-op and is not persisted. Callers
    /// pass one of the [`weights`] constants.
    pub fn record_category_usage(&mut self, category_id: &CategoryId, amount: u32) {
        if category_id.is_empty() {
            return;
        }
        self.map.record(category_id, amount);
        self.persist();
    }

    /// The accumulated score for `category_id`, or 0 if never recorded.
    #[must_use]
    pub fn score(&self, category_id: &CategoryId) -> u64 {
        self.map.score(category_id)
    }

    /// The full map, for ranking in the presentation layer.
    #[must_use]
    pub const fn map(&self) -> &UsageMap {
        &self.map
    }

    fn persist(&self) {
        match serde_json::to_string(&self.map) {
            Ok(raw) => {
                if let Err(e) = self.store.put(USAGE_KEY, &raw) {
                    tracing::warn!("usage snapshot not persisted: {e}");
                }
            }
            Err(e) => tracing::warn!("usage snapshot not serialized: {e}"),
        }
    }
}
