//! Per-category interest scores.
//!
//! The storefront records a small weighted score every time a shopper
//! interacts with a category (tile click, page visit, add-to-cart) and
//! uses the accumulated totals to rank category prominence. Scores only
//! ever grow; nothing in the storefront decrements them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::id::CategoryId;

/// Accumulated interest score per category.
///
/// Keys sort lexicographically, which keeps serialized snapshots stable
/// across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageMap(BTreeMap<CategoryId, u64>);

impl UsageMap {
    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add `amount` to the score for `category_id`, creating the entry
    /// if absent. An empty category id is a no-op.
    pub fn record(&mut self, category_id: &CategoryId, amount: u32) {
        if category_id.is_empty() {
            return;
        }
        let score = self.0.entry(category_id.clone()).or_insert(0);
        *score = score.saturating_add(u64::from(amount));
    }

    /// The accumulated score for `category_id`, or 0 if never recorded.
    #[must_use]
    pub fn score(&self, category_id: &CategoryId) -> u64 {
        self.0.get(category_id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(category, score)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&CategoryId, u64)> {
        self.0.iter().map(|(id, score)| (id, *score))
    }
}
