//! FreshMart Core - Shared types library.
//!
//! This crate provides the common types used across all FreshMart
//! components:
//! - `storefront` - Public-facing grocery store site
//! - `cli` - Command-line tools for catalog management
//!
//! # Architecture
//!
//! The core crate contains only types and their invariant logic - no I/O,
//! no HTTP clients, no template rendering. The cart and usage aggregates
//! live here so their rules can be tested without a running server.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, emails, catalog records, and the
//!   cart/usage aggregates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
