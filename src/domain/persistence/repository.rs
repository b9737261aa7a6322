//! Persistence port used by handlers and the request pipeline

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::api_key::ApiKey;
use crate::domain::audit::{LoggedRequest, LoggedResponse, RequestStats};
use crate::domain::contact::{Contact, ContactRequest, NewContact, NewContactRequest};
use crate::domain::DomainError;

/// Storage contract for contacts, audit records, statistics and API keys
///
/// Implementations must tolerate concurrent calls from many in-flight requests.
/// Lookups that find nothing return `Ok(None)`; `Err` is reserved for storage failures.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Verify the backing store is reachable
    async fn health_check(&self) -> Result<(), DomainError>;

    /// Get a contact by its normalized email
    async fn get_contact(&self, email: &str) -> Result<Option<Contact>, DomainError>;

    /// Create a contact and return its id
    async fn create_contact(&self, contact: NewContact) -> Result<String, DomainError>;

    async fn list_contacts(&self) -> Result<Vec<Contact>, DomainError>;

    /// Create a contact request and return its id
    async fn create_contact_request(&self, entry: NewContactRequest) -> Result<String, DomainError>;

    async fn list_contact_requests(&self) -> Result<Vec<ContactRequest>, DomainError>;

    /// Persist an inbound request record and return its id
    async fn log_request(&self, request: LoggedRequest) -> Result<String, DomainError>;

    /// Persist the response record paired with a logged request
    async fn log_response(&self, response: LoggedResponse) -> Result<(), DomainError>;

    /// Aggregate statistics over all audit records as of now
    async fn get_request_stats(&self) -> Result<RequestStats, DomainError>;

    async fn get_api_key(&self, key: &str) -> Result<Option<ApiKey>, DomainError>;
}
