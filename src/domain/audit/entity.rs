//! Audit record entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An inbound request as persisted by the audit logger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedRequest {
    pub id: String,
    /// Uppercase HTTP verb
    pub method: String,
    pub path: String,
    pub ip_address: String,
    pub request_ts: DateTime<Utc>,
}

impl LoggedRequest {
    pub fn new(
        id: impl Into<String>,
        method: &str,
        path: impl Into<String>,
        ip_address: impl Into<String>,
        request_ts: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            method: method.to_uppercase(),
            path: path.into(),
            ip_address: ip_address.into(),
            request_ts,
        }
    }
}

/// Outcome of a logged request, written once the handler has completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedResponse {
    pub request_id: String,
    pub status: u16,
    pub time_elapsed_ms: i64,
    pub response_ts: DateTime<Utc>,
}

impl LoggedResponse {
    pub fn new(
        request_id: impl Into<String>,
        status: u16,
        time_elapsed_ms: i64,
        response_ts: DateTime<Utc>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            status,
            time_elapsed_ms,
            response_ts,
        }
    }
}
