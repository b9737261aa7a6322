//! API key authorizer
//!
//! Checks a presented key against the stored keys and their expiry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::api_key::redact_key;
use crate::domain::{DomainError, Persistence};

/// Why a presented key was not accepted
#[derive(Debug, Error)]
pub enum AuthorizationError {
    #[error("API key is missing")]
    MissingKey,

    #[error("API key is not recognized")]
    UnknownKey,

    #[error("API key expired at {expires_at}")]
    Expired { expires_at: DateTime<Utc> },

    #[error("API key lookup failed: {0}")]
    Storage(#[source] DomainError),
}

impl AuthorizationError {
    /// Rejections of the credential itself, as opposed to lookup failures
    pub fn is_forbidden(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Identity attached to a request once its key has been accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedKey {
    pub owner: String,
}

#[derive(Clone)]
pub struct Authorizer {
    persistence: Arc<dyn Persistence>,
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer").finish_non_exhaustive()
    }
}

impl Authorizer {
    pub fn new(persistence: Arc<dyn Persistence>) -> Self {
        Self { persistence }
    }

    pub async fn authorize(&self, presented: &str) -> Result<AuthorizedKey, AuthorizationError> {
        self.authorize_at(presented, Utc::now()).await
    }

    /// Authorize against an explicit clock
    pub async fn authorize_at(
        &self,
        presented: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthorizedKey, AuthorizationError> {
        if presented.is_empty() {
            warn!("Rejected admin request without API key");
            return Err(AuthorizationError::MissingKey);
        }

        let key = self
            .persistence
            .get_api_key(presented)
            .await
            .map_err(AuthorizationError::Storage)?;

        let Some(key) = key else {
            warn!(key = %redact_key(presented), "Rejected unknown API key");
            return Err(AuthorizationError::UnknownKey);
        };

        if key.is_expired_at(now) {
            warn!(
                key = %key.redacted(),
                owner = %key.owner(),
                expires_at = %key.expires_at(),
                "Rejected expired API key"
            );
            return Err(AuthorizationError::Expired {
                expires_at: key.expires_at(),
            });
        }

        info!(owner = %key.owner(), "Authorized admin request");

        Ok(AuthorizedKey {
            owner: key.owner().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::persistence::MockPersistence;
    use crate::domain::ApiKey;
    use crate::infrastructure::storage::InMemoryPersistence;
    use chrono::Duration;

    fn authorizer_with(keys: Vec<ApiKey>) -> Authorizer {
        Authorizer::new(Arc::new(InMemoryPersistence::with_api_keys(keys)))
    }

    #[tokio::test]
    async fn test_valid_key_yields_owner() {
        let now = Utc::now();
        let authorizer =
            authorizer_with(vec![ApiKey::new("sk-valid", "alice", now, now + Duration::days(30))]);

        let authorized = authorizer.authorize_at("sk-valid", now).await.unwrap();

        assert_eq!(authorized.owner, "alice");
    }

    #[tokio::test]
    async fn test_empty_key_is_forbidden() {
        let authorizer = authorizer_with(vec![]);

        let err = authorizer.authorize("").await.unwrap_err();

        assert!(matches!(err, AuthorizationError::MissingKey));
        assert!(err.is_forbidden());
    }

    #[tokio::test]
    async fn test_unknown_key_is_forbidden() {
        let now = Utc::now();
        let authorizer =
            authorizer_with(vec![ApiKey::new("sk-one", "alice", now, now + Duration::days(1))]);

        let err = authorizer.authorize_at("sk-two", now).await.unwrap_err();

        assert!(matches!(err, AuthorizationError::UnknownKey));
    }

    #[tokio::test]
    async fn test_key_expired_yesterday_is_forbidden() {
        let now = Utc::now();
        let authorizer = authorizer_with(vec![ApiKey::new(
            "sk-old",
            "bob",
            now - Duration::days(30),
            now - Duration::days(1),
        )]);

        let err = authorizer.authorize_at("sk-old", now).await.unwrap_err();

        assert!(matches!(err, AuthorizationError::Expired { .. }));
        assert!(err.is_forbidden());
    }

    #[tokio::test]
    async fn test_key_expiring_now_is_forbidden() {
        let now = Utc::now();
        let authorizer =
            authorizer_with(vec![ApiKey::new("sk-edge", "carol", now - Duration::days(1), now)]);

        let err = authorizer.authorize_at("sk-edge", now).await.unwrap_err();
        assert!(matches!(err, AuthorizationError::Expired { .. }));

        let ok = authorizer
            .authorize_at("sk-edge", now - Duration::milliseconds(1))
            .await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn test_storage_failure_is_not_forbidden() {
        let mut mock = MockPersistence::new();
        mock.expect_get_api_key()
            .returning(|_| Err(DomainError::storage("connection refused")));
        let authorizer = Authorizer::new(Arc::new(mock));

        let err = authorizer.authorize("sk-any").await.unwrap_err();

        assert!(matches!(err, AuthorizationError::Storage(_)));
        assert!(!err.is_forbidden());
    }
}
