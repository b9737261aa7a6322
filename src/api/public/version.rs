use axum::{extract::State, http::StatusCode};
use serde_json::json;

use crate::api::state::AppState;
use crate::api::types::Envelope;

pub async fn get_version(State(state): State<AppState>) -> Envelope {
    Envelope::success(StatusCode::OK, json!({ "version": state.api_version }))
}
