//! Application state shared by middleware and handlers

use std::sync::Arc;

use crate::domain::{default_exemptions, DomainError, LoggingExemption, Persistence};
use crate::infrastructure::audit::AuditLogger;
use crate::infrastructure::auth::Authorizer;
use crate::infrastructure::resume::ResumeStore;

#[derive(Clone)]
pub struct AppState {
    pub persistence: Arc<dyn Persistence>,
    pub audit: AuditLogger,
    pub authorizer: Authorizer,
    pub resume: Arc<ResumeStore>,
    pub api_version: String,
    pub exemptions: Arc<[LoggingExemption]>,
}

impl AppState {
    /// Build state with the default exemption set for `api_version`
    pub fn new(
        persistence: Arc<dyn Persistence>,
        resume: ResumeStore,
        api_version: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let api_version = api_version.into();
        let exemptions = default_exemptions(&api_version)?;

        Ok(Self {
            audit: AuditLogger::new(persistence.clone()),
            authorizer: Authorizer::new(persistence.clone()),
            persistence,
            resume: Arc::new(resume),
            api_version,
            exemptions: exemptions.into(),
        })
    }

    /// Prefix shared by every API route, e.g. `/api/v1`
    pub fn api_prefix(&self) -> String {
        format!("/api/{}", self.api_version)
    }
}
