//! Session-related types.
//!
//! Types stored in the tower-sessions session: the signed-in user for
//! mock authentication and the client id that scopes durable storage.

use serde::{Deserialize, Serialize};

use freshmart_core::{Email, UserId};

/// Session-stored user identity.
///
/// Minimal data identifying the signed-in shopper. Authentication is a
/// mock: ids are minted per sign-in and nothing is checked against a
/// user database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    /// Display name; defaults to the email's local part when the
    /// sign-in flow provides none.
    pub name: String,
}

impl CurrentUser {
    /// Build a fresh identity for `email`, deriving the display name
    /// from the local part when `name` is `None`.
    #[must_use]
    pub fn sign_in(email: Email, name: Option<String>) -> Self {
        let name = name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| email.local_part().to_owned());
        Self {
            id: UserId::generate(),
            email,
            name,
        }
    }
}

/// Session keys.
pub mod session_keys {
    /// Key for storing the signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the client id scoping durable storage.
    pub const CLIENT_ID: &str = "client_id";
}
