//! PostgreSQL connection pooling and error translation

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::domain::DomainError;

/// PostgreSQL pool configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Time to wait for a free connection, in seconds
    pub acquire_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self::from(&DatabaseConfig::default())
    }
}

impl From<&DatabaseConfig> for PostgresConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            acquire_timeout_secs: config.acquire_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
            max_lifetime_secs: config.max_lifetime_secs,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_acquire_timeout(mut self, secs: u64) -> Self {
        self.acquire_timeout_secs = secs;
        self
    }

    pub fn with_idle_timeout(mut self, secs: u64) -> Self {
        self.idle_timeout_secs = secs;
        self
    }
}

/// Opens a connection pool
pub async fn connect(config: &PostgresConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
        .map_err(|e| {
            DomainError::store_unavailable(format!("Failed to connect to PostgreSQL: {}", e))
        })
}

/// Runs `SELECT 1` against the pool
pub async fn ping(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| map_sqlx_error("ping database", e))
}

/// Opens a transaction on the pool
pub async fn begin(pool: &PgPool) -> Result<Transaction<'static, Postgres>, DomainError> {
    pool.begin()
        .await
        .map_err(|e| map_sqlx_error("begin transaction", e))
}

/// Commits a transaction opened by [`begin`]
pub async fn commit(tx: Transaction<'static, Postgres>) -> Result<(), DomainError> {
    tx.commit()
        .await
        .map_err(|e| map_sqlx_error("commit transaction", e))
}

/// Deletes one row by primary key inside its own transaction
pub async fn delete_row(pool: &PgPool, table: &str, id: &Uuid) -> Result<bool, DomainError> {
    let mut tx = begin(pool).await?;

    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error(&format!("delete from {}", table), e))?;

    commit(tx).await?;
    Ok(result.rows_affected() > 0)
}

/// Translates a sqlx error raised while doing `action`
///
/// Unique violations become `Conflict`, foreign key and check violations
/// become `Validation`, anything else means the store is unavailable.
pub fn map_sqlx_error(action: &str, err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        let constraint = db.constraint().unwrap_or("constraint");

        if db.is_unique_violation() {
            return DomainError::conflict(format!("Duplicate value violates {}", constraint));
        }

        if db.is_foreign_key_violation() {
            return DomainError::validation(format!(
                "Referenced record does not exist ({})",
                constraint
            ));
        }

        if db.is_check_violation() {
            return DomainError::validation(format!("Value violates {}", constraint));
        }

        if is_data_exception(db.code().as_deref()) {
            return DomainError::validation(format!("Invalid value: {}", db.message()));
        }
    }

    DomainError::store_unavailable(format!("Failed to {}: {}", action, err))
}

/// SQLSTATE class 22: the value does not fit the column, such as numeric overflow
fn is_data_exception(code: Option<&str>) -> bool {
    code.is_some_and(|code| code.starts_with("22"))
}
