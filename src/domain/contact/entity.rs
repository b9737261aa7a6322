//! Contact entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person who has used the contact form at least once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A single message submitted through the contact form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub id: String,
    pub contact_id: String,
    /// Email of the owning contact, filled in on listing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Data needed to create a contact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
}

impl NewContact {
    pub fn new(name: impl Into<String>, email: &str) -> Self {
        Self {
            name: name.into(),
            email: normalize_email(email),
        }
    }
}

/// Data needed to create a contact request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactRequest {
    pub contact_id: String,
    pub message: String,
}

impl NewContactRequest {
    pub fn new(contact_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            contact_id: contact_id.into(),
            message: message.into(),
        }
    }
}

/// Contacts are keyed by their lowercased, trimmed email
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
