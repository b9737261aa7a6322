//! In-memory persistence implementation

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{
    new_record_id, ApiKey, Contact, ContactRequest, DomainError, Histogram, LoggedRequest,
    LoggedResponse, NewContact, NewContactRequest, Persistence, RequestStats,
};

#[derive(Debug, Default)]
struct Tables {
    contacts: Vec<Contact>,
    contact_requests: Vec<ContactRequest>,
    requests: Vec<LoggedRequest>,
    responses: Vec<LoggedResponse>,
    api_keys: HashMap<String, ApiKey>,
}

/// In-memory persistence enforcing the same keys and references as the SQL schema
///
/// Failures can be injected for all operations or for audit writes only.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    tables: RwLock<Tables>,
    should_fail: AtomicBool,
    audit_should_fail: AtomicBool,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given API keys
    pub fn with_api_keys(keys: impl IntoIterator<Item = ApiKey>) -> Self {
        let tables = Tables {
            api_keys: keys.into_iter().map(|k| (k.key().to_string(), k)).collect(),
            ..Tables::default()
        };

        Self {
            tables: RwLock::new(tables),
            ..Self::default()
        }
    }

    /// Make every operation fail with a storage error
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Make only `log_request` and `log_response` fail
    pub fn set_audit_should_fail(&self, fail: bool) {
        self.audit_should_fail.store(fail, Ordering::SeqCst);
    }

    pub async fn logged_requests(&self) -> Vec<LoggedRequest> {
        self.tables.read().await.requests.clone()
    }

    pub async fn logged_responses(&self) -> Vec<LoggedResponse> {
        self.tables.read().await.responses.clone()
    }

    fn check_should_fail(&self) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::storage("In-memory store configured to fail"));
        }
        Ok(())
    }

    fn check_audit_should_fail(&self) -> Result<(), DomainError> {
        self.check_should_fail()?;

        if self.audit_should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::storage("In-memory audit log configured to fail"));
        }
        Ok(())
    }
}

#[async_trait]
impl Persistence for InMemoryPersistence {
    async fn health_check(&self) -> Result<(), DomainError> {
        self.check_should_fail()
    }

    async fn get_contact(&self, email: &str) -> Result<Option<Contact>, DomainError> {
        self.check_should_fail()?;
        let tables = self.tables.read().await;
        Ok(tables.contacts.iter().find(|c| c.email == email).cloned())
    }

    async fn create_contact(&self, contact: NewContact) -> Result<String, DomainError> {
        self.check_should_fail()?;
        let mut tables = self.tables.write().await;

        if tables.contacts.iter().any(|c| c.email == contact.email) {
            return Err(DomainError::storage(format!(
                "Contact with email '{}' already exists",
                contact.email
            )));
        }

        let id = new_record_id();
        tables.contacts.push(Contact {
            id: id.clone(),
            name: contact.name,
            email: contact.email,
            created_at: Utc::now(),
        });

        Ok(id)
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, DomainError> {
        self.check_should_fail()?;
        Ok(self.tables.read().await.contacts.clone())
    }

    async fn create_contact_request(&self, entry: NewContactRequest) -> Result<String, DomainError> {
        self.check_should_fail()?;
        let mut tables = self.tables.write().await;

        if !tables.contacts.iter().any(|c| c.id == entry.contact_id) {
            return Err(DomainError::storage(format!(
                "Contact '{}' does not exist",
                entry.contact_id
            )));
        }

        let id = new_record_id();
        tables.contact_requests.push(ContactRequest {
            id: id.clone(),
            contact_id: entry.contact_id,
            email: None,
            message: entry.message,
            created_at: Utc::now(),
        });

        Ok(id)
    }

    async fn list_contact_requests(&self) -> Result<Vec<ContactRequest>, DomainError> {
        self.check_should_fail()?;
        let tables = self.tables.read().await;

        let requests = tables
            .contact_requests
            .iter()
            .map(|request| ContactRequest {
                email: tables
                    .contacts
                    .iter()
                    .find(|c| c.id == request.contact_id)
                    .map(|c| c.email.clone()),
                ..request.clone()
            })
            .collect();

        Ok(requests)
    }

    async fn log_request(&self, request: LoggedRequest) -> Result<String, DomainError> {
        self.check_audit_should_fail()?;
        let mut tables = self.tables.write().await;

        if tables.requests.iter().any(|r| r.id == request.id) {
            return Err(DomainError::storage(format!(
                "Logged request '{}' already exists",
                request.id
            )));
        }

        let id = request.id.clone();
        tables.requests.push(request);
        Ok(id)
    }

    async fn log_response(&self, response: LoggedResponse) -> Result<(), DomainError> {
        self.check_audit_should_fail()?;
        let mut tables = self.tables.write().await;

        if !tables.requests.iter().any(|r| r.id == response.request_id) {
            return Err(DomainError::storage(format!(
                "Logged request '{}' does not exist",
                response.request_id
            )));
        }

        if tables
            .responses
            .iter()
            .any(|r| r.request_id == response.request_id)
        {
            return Err(DomainError::storage(format!(
                "Response for request '{}' already logged",
                response.request_id
            )));
        }

        tables.responses.push(response);
        Ok(())
    }

    async fn get_request_stats(&self) -> Result<RequestStats, DomainError> {
        self.check_should_fail()?;
        let tables = self.tables.read().await;

        let unique_ips: HashSet<&str> = tables
            .requests
            .iter()
            .map(|r| r.ip_address.as_str())
            .collect();

        Ok(RequestStats {
            total_requests: tables.requests.len() as i64,
            unique_ip_count: unique_ips.len() as i64,
            path_counts: Histogram::tally(tables.requests.iter().map(|r| r.path.clone())),
            status_counts: Histogram::tally(tables.responses.iter().map(|r| r.status)),
        })
    }

    async fn get_api_key(&self, key: &str) -> Result<Option<ApiKey>, DomainError> {
        self.check_should_fail()?;
        Ok(self.tables.read().await.api_keys.get(key).cloned())
    }
}
