use axum::extract::{Extension, State};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::Envelope;
use crate::infrastructure::auth::AuthorizedKey;

pub async fn list_contacts(
    State(state): State<AppState>,
    Extension(key): Extension<AuthorizedKey>,
) -> Envelope {
    info!(owner = %key.owner, "Listing contacts");

    match state.persistence.list_contacts().await {
        Ok(contacts) => Envelope::data(contacts),
        Err(e) => e.into(),
    }
}

/// Contact requests joined with their contact's email
pub async fn list_contact_requests(
    State(state): State<AppState>,
    Extension(key): Extension<AuthorizedKey>,
) -> Envelope {
    info!(owner = %key.owner, "Listing contact requests");

    match state.persistence.list_contact_requests().await {
        Ok(requests) => Envelope::data(requests),
        Err(e) => e.into(),
    }
}
