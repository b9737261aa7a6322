//! API Key entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A provisioned admin API key
///
/// Keys are created outside this service; here they are only looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    key: String,
    owner: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl ApiKey {
    pub fn new(
        key: impl Into<String>,
        owner: impl Into<String>,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key: key.into(),
            owner: owner.into(),
            created_at,
            expires_at,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// A key whose expiry equals `now` is already expired
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// First characters of the key, safe to put in logs
    pub fn redacted(&self) -> String {
        redact_key(&self.key)
    }
}

pub fn redact_key(key: &str) -> String {
    format!("{}...", key.chars().take(4).collect::<String>())
}
