//! File-backed resume store

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info};

use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResumeFormat {
    #[default]
    Json,
    Pdf,
}

impl ResumeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ResumeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResumeFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pdf" => Ok(Self::Pdf),
            other => Err(DomainError::validation(format!(
                "Invalid resume format: {}",
                other
            ))),
        }
    }
}

/// Resume content ready to be placed in a response payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResumeDocument {
    /// Always a JSON object
    Json(Value),
    /// Base64 of the PDF bytes, standard alphabet
    Pdf(String),
}

#[derive(Debug, Clone)]
pub struct ResumeStore {
    json_path: PathBuf,
    pdf_path: Option<PathBuf>,
}

impl ResumeStore {
    /// An empty PDF path means no PDF is offered
    pub fn new(json_path: impl Into<PathBuf>, pdf_path: impl Into<PathBuf>) -> Self {
        let pdf_path = pdf_path.into();

        Self {
            json_path: json_path.into(),
            pdf_path: (!pdf_path.as_os_str().is_empty()).then_some(pdf_path),
        }
    }

    pub fn supports(&self, format: ResumeFormat) -> bool {
        match format {
            ResumeFormat::Json => true,
            ResumeFormat::Pdf => self.pdf_path.is_some(),
        }
    }

    pub async fn load(&self, format: ResumeFormat) -> Result<ResumeDocument, DomainError> {
        match format {
            ResumeFormat::Json => {
                let bytes = read_file(&self.json_path).await?;
                let object = serde_json::from_slice::<Map<String, Value>>(&bytes).map_err(|e| {
                    error!(path = %self.json_path.display(), error = %e, "Failed to parse JSON resume");
                    DomainError::internal(format!("Failed to parse JSON resume: {}", e))
                })?;
                Ok(ResumeDocument::Json(Value::Object(object)))
            }
            ResumeFormat::Pdf => {
                let path = self
                    .pdf_path
                    .as_deref()
                    .ok_or_else(|| DomainError::not_found("No PDF resume configured"))?;
                let bytes = read_file(path).await?;
                Ok(ResumeDocument::Pdf(STANDARD.encode(bytes)))
            }
        }
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>, DomainError> {
    info!(path = %path.display(), "Serving resume file");

    tokio::fs::read(path).await.map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to read resume file");
        DomainError::internal(format!("Failed to read resume file: {}", e))
    })
}
