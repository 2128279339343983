//! Per-client storage scope extractor.
//!
//! Each browser session gets a stable client id, minted on first touch
//! and held in the session. The extractor wraps the shared storage
//! backend in a [`ScopedStore`] keyed by that id, which is what the cart
//! store and usage tracker persist through.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::models::session_keys;
use crate::state::AppState;
use crate::stores::ScopedStore;

/// Extractor providing the durable storage scope for the current client.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(ClientStorage(storage): ClientStorage) -> impl IntoResponse {
///     let mut cart = CartStore::open(storage);
///     // ...
/// }
/// ```
pub struct ClientStorage(pub ScopedStore);

impl FromRequestParts<AppState> for ClientStorage {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

        let client_id: Uuid = match session
            .get::<Uuid>(session_keys::CLIENT_ID)
            .await
            .ok()
            .flatten()
        {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                if let Err(e) = session.insert(session_keys::CLIENT_ID, id).await {
                    // The scope still works for this request; it just
                    // won't be stable across requests until a later
                    // insert succeeds.
                    tracing::warn!("failed to save client id to session: {e}");
                }
                id
            }
        };

        Ok(Self(ScopedStore::new(
            state.storage(),
            &client_id.to_string(),
        )))
    }
}
