//! Query string extractor answering with the envelope

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::Envelope;

/// Wrapper around `axum::extract::Query` rejecting with the canonical 400 envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Envelope;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) = axum::extract::Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                debug!(error = %rejection.body_text(), "Rejected query string");
                Envelope::bad_request()
            })?;

        Ok(Self(value))
    }
}
