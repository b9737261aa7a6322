//! Admin authorization middleware
//!
//! Admin routes require an `X-API-Key` header naming a stored, unexpired key.
//! The accepted [`AuthorizedKey`] is placed in the request extensions.

use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::error;

use crate::api::state::AppState;
use crate::api::types::Envelope;
use crate::infrastructure::auth::AuthorizedKey;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Extractor that requires a valid admin API key
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthorizedKey);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = Envelope;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = presented_key(&parts.headers);

        match state.authorizer.authorize(&presented).await {
            Ok(key) => Ok(RequireAdmin(key)),
            Err(e) if e.is_forbidden() => Err(Envelope::forbidden()),
            Err(e) => {
                error!(error = %e, "Admin authorization failed");
                Err(Envelope::internal_error())
            }
        }
    }
}

/// Route layer guarding admin handlers
pub async fn require_admin(
    RequireAdmin(key): RequireAdmin,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(key);
    next.run(request).await
}

/// Missing or non-UTF-8 headers count as an empty key
fn presented_key(headers: &HeaderMap) -> String {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
