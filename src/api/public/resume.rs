//! Resume download endpoint

use axum::extract::State;
use serde::Deserialize;
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::api::types::{Envelope, Query};
use crate::infrastructure::resume::ResumeFormat;

#[derive(Debug, Default, Deserialize)]
pub struct ResumeQuery {
    /// `json` (default) or `pdf`, case-insensitive
    pub format: Option<String>,
}

pub async fn get_resume(State(state): State<AppState>, Query(query): Query<ResumeQuery>) -> Envelope {
    let format = match query.format.as_deref() {
        None | Some("") => ResumeFormat::default(),
        Some(raw) => match raw.parse::<ResumeFormat>() {
            Ok(format) => format,
            Err(e) => {
                warn!(format = %raw, "Invalid resume format requested");
                return e.into();
            }
        },
    };

    if !state.resume.supports(format) {
        warn!(%format, "Resume format not configured");
        return Envelope::not_implemented();
    }

    info!(%format, "Processing resume request");

    match state.resume.load(format).await {
        Ok(document) => Envelope::data(document),
        Err(e) => e.into(),
    }
}
