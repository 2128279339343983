//! Core type definitions.

pub mod cart;
pub mod catalog;
pub mod email;
pub mod id;
pub mod price;
pub mod usage;

pub use cart::{Cart, CartLine};
pub use catalog::{Category, Product};
pub use email::{Email, EmailError};
pub use id::{CategoryId, ProductId, UserId};
pub use price::Price;
pub use usage::UsageMap;
