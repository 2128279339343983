//! Client-local state stores.
//!
//! The storefront's per-client state (cart line items, category usage
//! scores) lives in small store objects that pair an in-memory aggregate
//! with a durable key-value backend. Every mutation runs as
//! mutate-then-persist; persistence is best-effort and a failed write
//! never rolls back or surfaces to the shopper - the in-memory state
//! stays authoritative for the rest of the session.
//!
//! Stores are constructed per request from the client's storage scope
//! (see [`crate::middleware::ClientStorage`]); nothing here is a
//! process-wide singleton, so tests build isolated instances freely.

pub mod cart;
pub mod kv;
pub mod usage;

pub use cart::CartStore;
pub use kv::{KeyValueStore, MemoryStore, ScopedStore, StoreError};
pub use usage::UsageTracker;
