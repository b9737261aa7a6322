//! Best-effort audit logger
//!
//! A record is opened before a request is dispatched and closed once the
//! handler has produced a response. Storage failures never fail the request:
//! they are logged and counted in `audit_write_failures_total`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::{new_record_id, LoggedRequest, LoggedResponse, Persistence};
use crate::infrastructure::observability::{record_audit_write_failure, AuditPhase};

/// An audit record awaiting its response half
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRecord {
    request_id: String,
    persisted: bool,
}

impl OpenRecord {
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// False when the request row could not be written
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }
}

#[derive(Clone)]
pub struct AuditLogger {
    persistence: Arc<dyn Persistence>,
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger").finish_non_exhaustive()
    }
}

impl AuditLogger {
    pub fn new(persistence: Arc<dyn Persistence>) -> Self {
        Self { persistence }
    }

    /// Persist the request half of a new audit record
    pub async fn open_record(
        &self,
        method: &str,
        path: &str,
        ip_address: &str,
        now: DateTime<Utc>,
    ) -> OpenRecord {
        let request = LoggedRequest::new(new_record_id(), method, path, ip_address, now);
        let request_id = request.id.clone();

        debug!(request_id = %request_id, method = %request.method, path = %path, "Tracing request");

        match self.persistence.log_request(request).await {
            Ok(id) => OpenRecord {
                request_id: id,
                persisted: true,
            },
            Err(e) => {
                warn!(request_id = %request_id, error = %e, "Failed to log request");
                record_audit_write_failure(AuditPhase::Request);

                OpenRecord {
                    request_id,
                    persisted: false,
                }
            }
        }
    }

    /// Persist the response half of an audit record
    ///
    /// Skipped when the request half was never written, since the response row
    /// must reference it.
    pub async fn close_record(
        &self,
        record: &OpenRecord,
        status: u16,
        elapsed_ms: i64,
        now: DateTime<Utc>,
    ) {
        if !record.persisted {
            debug!(request_id = %record.request_id, "Skipping response log for unpersisted request");
            record_audit_write_failure(AuditPhase::Response);
            return;
        }

        let response = LoggedResponse::new(&record.request_id, status, elapsed_ms, now);

        if let Err(e) = self.persistence.log_response(response).await {
            warn!(request_id = %record.request_id, error = %e, "Failed to log response");
            record_audit_write_failure(AuditPhase::Response);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryPersistence;

    fn logger_with_store() -> (AuditLogger, Arc<InMemoryPersistence>) {
        let store = Arc::new(InMemoryPersistence::new());
        (AuditLogger::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_open_and_close_record() {
        let (logger, store) = logger_with_store();
        let now = Utc::now();

        let record = logger.open_record("get", "/a", "10.0.0.1", now).await;
        logger.close_record(&record, 200, 7, now).await;

        let requests = store.logged_requests().await;
        let responses = store.logged_responses().await;

        assert!(record.is_persisted());
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].id, record.request_id());
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].ip_address, "10.0.0.1");
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].request_id, record.request_id());
        assert_eq!(responses[0].status, 200);
        assert_eq!(responses[0].time_elapsed_ms, 7);
    }

    #[tokio::test]
    async fn test_records_get_distinct_ids() {
        let (logger, _store) = logger_with_store();
        let now = Utc::now();

        let first = logger.open_record("GET", "/a", "10.0.0.1", now).await;
        let second = logger.open_record("GET", "/a", "10.0.0.1", now).await;

        assert_ne!(first.request_id(), second.request_id());
    }

    #[tokio::test]
    async fn test_open_failure_is_swallowed() {
        let (logger, store) = logger_with_store();
        store.set_audit_should_fail(true);

        let record = logger.open_record("GET", "/a", "10.0.0.1", Utc::now()).await;

        assert!(!record.is_persisted());
        assert_eq!(record.request_id().len(), 32);
    }

    #[tokio::test]
    async fn test_close_skipped_when_open_failed() {
        let (logger, store) = logger_with_store();
        store.set_audit_should_fail(true);
        let record = logger.open_record("GET", "/a", "10.0.0.1", Utc::now()).await;

        store.set_audit_should_fail(false);
        logger.close_record(&record, 200, 1, Utc::now()).await;

        assert!(store.logged_requests().await.is_empty());
        assert!(store.logged_responses().await.is_empty());
    }

    #[tokio::test]
    async fn test_close_failure_is_swallowed() {
        let (logger, store) = logger_with_store();
        let record = logger.open_record("GET", "/a", "10.0.0.1", Utc::now()).await;

        store.set_audit_should_fail(true);
        logger.close_record(&record, 500, 1, Utc::now()).await;

        assert_eq!(store.logged_requests().await.len(), 1);
        assert!(store.logged_responses().await.is_empty());
    }
}
