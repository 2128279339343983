//! Durable key-value storage boundary.
//!
//! The storefront persists client state through a deliberately small
//! contract: string keys, string values, synchronous calls. Reads that
//! fail for any reason surface as "nothing stored"; writes report
//! failure so callers can log and move on. This mirrors how browser
//! local storage behaves - quota errors and disabled storage degrade the
//! experience, they never break it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Errors writing to a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend refused the write (quota, read-only mount, ...).
    #[error("storage rejected write for key {key}: {reason}")]
    WriteRejected { key: String, reason: String },
    /// The backend is not usable at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A key-scoped, string-valued durable store.
///
/// Values are UTF-8 JSON produced by the calling store object; this
/// layer treats them as opaque strings.
pub trait KeyValueStore: Send + Sync {
    /// The value stored under `key`, or `None` when the key is missing
    /// or the backend cannot be read.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend rejects the write.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Process-local in-memory store.
///
/// The default backend for a single-node deployment and the backend for
/// every test. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// View of a shared store with every key prefixed by a client scope.
///
/// One backend serves many browser sessions; scoping gives each client
/// the isolated keyspace the browser gives each origin. Two sessions
/// never observe each other's keys, which is also why concurrent tabs
/// backed by different sessions may diverge.
#[derive(Clone)]
pub struct ScopedStore {
    inner: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl ScopedStore {
    /// Wrap `inner`, prefixing every key with `scope`.
    #[must_use]
    pub fn new(inner: Arc<dyn KeyValueStore>, scope: &str) -> Self {
        Self {
            inner,
            prefix: format!("{scope}/"),
        }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

impl KeyValueStore for ScopedStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(&self.scoped(key))
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.put(&self.scoped(key), value)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{KeyValueStore, StoreError};

    /// Backend that accepts nothing and returns nothing, standing in for
    /// disabled or full storage.
    #[derive(Debug, Clone, Default)]
    pub struct RejectingStore;

    impl KeyValueStore for RejectingStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn put(&self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::WriteRejected {
                key: key.to_owned(),
                reason: "quota exceeded".to_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("cart_v1"), None);

        store.put("cart_v1", "[]").expect("write");
        assert_eq!(store.get("cart_v1").as_deref(), Some("[]"));
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let clone = store.clone();

        store.put("k", "v").expect("write");
        assert_eq!(clone.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_scoped_stores_are_isolated() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let alice = ScopedStore::new(backend.clone(), "client-a");
        let bob = ScopedStore::new(backend, "client-b");

        alice.put("cart_v1", "alice").expect("write");
        bob.put("cart_v1", "bob").expect("write");

        assert_eq!(alice.get("cart_v1").as_deref(), Some("alice"));
        assert_eq!(bob.get("cart_v1").as_deref(), Some("bob"));
    }
}
