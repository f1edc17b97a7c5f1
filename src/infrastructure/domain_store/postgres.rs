//! PostgreSQL domain store with connection pooling

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::info;

use crate::domain::{DkimKeyPair, Domain, DomainError, DomainName, DomainStore};

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection acquire timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/mailhub".to_string(),
            max_connections: 10,
            connect_timeout_secs: 30,
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
}

/// PostgreSQL implementation of DomainStore
///
/// Name uniqueness is the table's primary key; secret rotation is a single
/// `UPDATE ... RETURNING` statement.
#[derive(Debug, Clone)]
pub struct PostgresDomainStore {
    pool: PgPool,
}

impl PostgresDomainStore {
    /// Create a store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a new pool
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| {
                DomainError::unavailable(format!("Failed to connect to PostgreSQL: {}", e))
            })?;

        Ok(Self::new(pool))
    }

    /// Ensures the domains table exists
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS domains (
                domain VARCHAR(253) PRIMARY KEY,
                key TEXT NOT NULL,
                dkim_private_key TEXT NOT NULL,
                dkim_public_key TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                seq BIGSERIAL NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::unavailable(format!("Failed to create domains table: {}", e)))?;

        info!("Domains table ready");
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl DomainStore for PostgresDomainStore {
    async fn create(&self, domain: Domain) -> Result<Domain, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO domains (domain, key, dkim_private_key, dkim_public_key,
                                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(domain.name().as_str())
        .bind(domain.secret())
        .bind(domain.dkim_private_key())
        .bind(domain.dkim_public_key())
        .bind(domain.created_at())
        .bind(domain.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::already_exists(format!("Domain '{}' already exists", domain.name()))
            } else {
                DomainError::unavailable(format!("Failed to create domain: {}", e))
            }
        })?;

        Ok(domain)
    }

    async fn get_by_name(&self, name: &DomainName) -> Result<Option<Domain>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT domain, key, dkim_private_key, dkim_public_key, created_at, updated_at
            FROM domains
            WHERE domain = $1
            "#,
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::unavailable(format!("Failed to get domain: {}", e)))?;

        row.as_ref().map(row_to_domain).transpose()
    }

    async fn get_all(&self) -> Result<Vec<Domain>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT domain, key, dkim_private_key, dkim_public_key, created_at, updated_at
            FROM domains
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::unavailable(format!("Failed to list domains: {}", e)))?;

        rows.iter().map(row_to_domain).collect()
    }

    async fn update_secret(&self, name: &DomainName, secret: &str) -> Result<Domain, DomainError> {
        let row = sqlx::query(
            r#"
            UPDATE domains
            SET key = $2, updated_at = NOW()
            WHERE domain = $1
            RETURNING domain, key, dkim_private_key, dkim_public_key, created_at, updated_at
            "#,
        )
        .bind(name.as_str())
        .bind(secret)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::unavailable(format!("Failed to update domain key: {}", e)))?;

        match row {
            Some(row) => row_to_domain(&row),
            None => Err(DomainError::not_found(format!("Domain '{}' not found", name))),
        }
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

fn row_to_domain(row: &PgRow) -> Result<Domain, DomainError> {
    let column_error =
        |e: sqlx::Error| DomainError::internal(format!("Failed to read domain row: {}", e));

    let name: String = row.try_get("domain").map_err(column_error)?;
    let name = DomainName::new(&name).map_err(|e| {
        DomainError::internal(format!("Stored domain name '{}' is invalid: {}", name, e))
    })?;

    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(column_error)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(column_error)?;

    Ok(Domain::restore(
        name,
        row.try_get("key").map_err(column_error)?,
        DkimKeyPair {
            public_key: row.try_get("dkim_public_key").map_err(column_error)?,
            private_key: row.try_get("dkim_private_key").map_err(column_error)?,
        },
        created_at,
        updated_at,
    ))
}
