//! Health check endpoint

use axum::{extract::State, http::StatusCode};
use serde_json::json;
use tracing::{error, info};

use crate::api::state::AppState;
use crate::api::types::Envelope;

/// Pings the database
pub async fn health_check(State(state): State<AppState>) -> Envelope {
    info!("Processing health check request");

    match state.persistence.health_check().await {
        Ok(()) => Envelope::success(StatusCode::OK, json!({ "status": "ok" })),
        Err(e) => {
            error!(error = %e, "Health check failed");
            Envelope::internal_error()
        }
    }
}
