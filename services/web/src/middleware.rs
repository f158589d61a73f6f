//! Middleware resolving the caller's session

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::debug;

use crate::models::{IdentityId, SessionContext};

/// Header carrying the signed-in identity
pub const IDENTITY_HEADER: &str = "x-identity-id";

/// Attach a [`SessionContext`] to every request. Requests without a usable
/// identity header are guests.
pub async fn session_middleware(mut req: Request<Body>, next: Next) -> Response {
    let identity = req
        .headers()
        .get(IDENTITY_HEADER)
        .and_then(|header| header.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(IdentityId::new);

    let session = match identity {
        Some(id) => {
            debug!("Request from identity {}", id);
            SessionContext::signed_in(id)
        }
        None => SessionContext::guest(),
    };

    req.extensions_mut().insert(session);

    next.run(req).await
}
