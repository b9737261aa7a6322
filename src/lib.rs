//! Site API
//!
//! Backend for a personal site:
//! - Public health, version, resume and contact form endpoints
//! - Admin statistics and contact listings behind `X-API-Key`
//! - Audit logging of every non-exempt request and its response

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::AppState;
use domain::{DomainError, Persistence};
use infrastructure::resume::ResumeStore;

/// Create the application state over an already connected persistence layer
///
/// Fails when the logging exemption patterns do not compile.
pub fn create_app_state(
    config: &AppConfig,
    persistence: Arc<dyn Persistence>,
) -> Result<AppState, DomainError> {
    let resume = ResumeStore::new(&config.resume_path_json, &config.resume_path_pdf);
    let state = AppState::new(persistence, resume, config.api_version.clone())?;

    tracing::info!(
        exemptions = state.exemptions.len(),
        api_version = %state.api_version,
        "Application state created"
    );

    Ok(state)
}
