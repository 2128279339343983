//! Request ID middleware for request tracing and correlation.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Ensure every request has a request ID.
///
/// An `x-request-id` supplied by an upstream proxy is kept; otherwise a
/// fresh UUID v4 is minted. The ID is tagged onto the Sentry scope and
/// echoed back in the response headers so a shopper's bug report can be
/// matched to logs.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|header| header.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });
    tracing::debug!(%request_id, "request");

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
