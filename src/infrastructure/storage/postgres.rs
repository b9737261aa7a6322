//! PostgreSQL persistence with connection pooling

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::domain::{
    new_record_id, ApiKey, Contact, ContactRequest, DomainError, Histogram, LoggedRequest,
    LoggedResponse, NewContact, NewContactRequest, Persistence, RequestStats,
};

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "postgres".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }
}

/// Persistence backed by the `base` schema
///
/// Every call acquires a pooled connection for the duration of one query (or
/// one transaction) and returns it to the pool on every exit path.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the connection pool and verifies connectivity
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool))
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Persistence for PostgresPersistence {
    async fn health_check(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Health check failed: {}", e)))?;

        Ok(())
    }

    async fn get_contact(&self, email: &str) -> Result<Option<Contact>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, created_at
            FROM base.contacts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get contact: {}", e)))?;

        row.as_ref().map(row_to_contact).transpose()
    }

    async fn create_contact(&self, contact: NewContact) -> Result<String, DomainError> {
        let id = new_record_id();

        sqlx::query(
            r#"
            INSERT INTO base.contacts (id, name, email, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&id)
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create contact: {}", e)))?;

        Ok(id)
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, created_at
            FROM base.contacts
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list contacts: {}", e)))?;

        rows.iter().map(row_to_contact).collect()
    }

    async fn create_contact_request(&self, entry: NewContactRequest) -> Result<String, DomainError> {
        let id = new_record_id();

        sqlx::query(
            r#"
            INSERT INTO base.contact_requests (id, contact_id, message, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&id)
        .bind(&entry.contact_id)
        .bind(&entry.message)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create contact request: {}", e)))?;

        Ok(id)
    }

    async fn list_contact_requests(&self) -> Result<Vec<ContactRequest>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.contact_id, c.email, r.message, r.created_at
            FROM base.contact_requests r
            LEFT JOIN base.contacts c ON c.id = r.contact_id
            ORDER BY r.created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list contact requests: {}", e)))?;

        rows.iter().map(row_to_contact_request).collect()
    }

    async fn log_request(&self, request: LoggedRequest) -> Result<String, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO base.logged_requests (id, method, path, ip_address, request_ts)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&request.id)
        .bind(&request.method)
        .bind(&request.path)
        .bind(&request.ip_address)
        .bind(request.request_ts)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to log request: {}", e)))?;

        Ok(request.id)
    }

    async fn log_response(&self, response: LoggedResponse) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO base.logged_responses (id, status, time_elapsed, response_ts)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&response.request_id)
        .bind(i32::from(response.status))
        .bind(response.time_elapsed_ms)
        .bind(response.response_ts)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to log response: {}", e)))?;

        Ok(())
    }

    async fn get_request_stats(&self) -> Result<RequestStats, DomainError> {
        let totals = sqlx::query(
            r#"
            SELECT COUNT(*) AS total_requests,
                   COUNT(DISTINCT ip_address) AS unique_ip_count
            FROM base.logged_requests
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to count requests: {}", e)))?;

        let path_rows = sqlx::query(
            r#"
            SELECT path, COUNT(*) AS request_count
            FROM base.logged_requests
            GROUP BY path
            ORDER BY request_count DESC, path
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to count paths: {}", e)))?;

        let status_rows = sqlx::query(
            r#"
            SELECT status, COUNT(*) AS status_count
            FROM base.logged_responses
            GROUP BY status
            ORDER BY status_count DESC, status
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to count statuses: {}", e)))?;

        let path_counts = path_rows
            .iter()
            .map(|row| Ok((column::<String>(row, "path")?, column::<i64>(row, "request_count")?)))
            .collect::<Result<Vec<_>, DomainError>>()?;

        let status_counts = status_rows
            .iter()
            .map(|row| {
                let status = column::<i32>(row, "status")?;
                let status = u16::try_from(status).map_err(|_| {
                    DomainError::storage(format!("Invalid status code in audit log: {}", status))
                })?;
                Ok((status, column::<i64>(row, "status_count")?))
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(RequestStats {
            total_requests: column(&totals, "total_requests")?,
            unique_ip_count: column(&totals, "unique_ip_count")?,
            path_counts: Histogram::from_counts(path_counts),
            status_counts: Histogram::from_counts(status_counts),
        })
    }

    async fn get_api_key(&self, key: &str) -> Result<Option<ApiKey>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT key, owner, created_at, expires_at
            FROM base.api_keys
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get API key: {}", e)))?;

        match row {
            Some(row) => Ok(Some(ApiKey::new(
                column::<String>(&row, "key")?,
                column::<String>(&row, "owner")?,
                column::<DateTime<Utc>>(&row, "created_at")?,
                column::<DateTime<Utc>>(&row, "expires_at")?,
            ))),
            None => Ok(None),
        }
    }
}

fn column<T>(row: &PgRow, name: &str) -> Result<T, DomainError>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::storage(format!("Failed to read column '{}': {}", name, e)))
}

fn row_to_contact(row: &PgRow) -> Result<Contact, DomainError> {
    Ok(Contact {
        id: column(row, "id")?,
        name: column::<Option<String>>(row, "name")?.unwrap_or_default(),
        email: column(row, "email")?,
        created_at: column(row, "created_at")?,
    })
}

fn row_to_contact_request(row: &PgRow) -> Result<ContactRequest, DomainError> {
    Ok(ContactRequest {
        id: column(row, "id")?,
        contact_id: column(row, "contact_id")?,
        email: column(row, "email")?,
        message: column(row, "message")?,
        created_at: column(row, "created_at")?,
    })
}
