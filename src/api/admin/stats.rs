use axum::extract::{Extension, State};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::Envelope;
use crate::infrastructure::auth::AuthorizedKey;

/// Aggregate request statistics over the audit log
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(key): Extension<AuthorizedKey>,
) -> Envelope {
    info!(owner = %key.owner, "Processing stats request");

    match state.persistence.get_request_stats().await {
        Ok(stats) => Envelope::data(stats),
        Err(e) => e.into(),
    }
}
