//! mailhub
//!
//! Domain identity and key lifecycle for a multi-tenant outbound mail
//! platform:
//! - Domain registration with generated API secrets and DKIM key pairs
//! - Secret rotation that takes effect on the next request
//! - Basic-auth gate resolving Mail API calls to a single tenant
//! - In-memory and PostgreSQL domain stores

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use api::AppState;
use config::StorageBackend;
use domain::DomainStore;
use infrastructure::domain_store::{InMemoryDomainStore, PostgresConfig, PostgresDomainStore};
use infrastructure::keys::SecureKeyGenerator;
use infrastructure::mail_domain::{Authenticator, DomainManager};

/// The domain store selected at startup
///
/// Owned by the process so the backend can be shut down cleanly after the
/// server stops.
#[derive(Debug, Clone)]
pub enum StoreHandle {
    Memory(Arc<InMemoryDomainStore>),
    Postgres(Arc<PostgresDomainStore>),
}

impl StoreHandle {
    /// Open the configured backend
    pub async fn open(config: &AppConfig) -> anyhow::Result<Self> {
        info!(backend = ?config.storage.backend, "Opening domain store");

        match config.storage.backend {
            StorageBackend::Memory => Ok(Self::Memory(Arc::new(InMemoryDomainStore::new()))),
            StorageBackend::Postgres => {
                let url = config
                    .storage
                    .database_url
                    .clone()
                    .or_else(|| std::env::var("DATABASE_URL").ok())
                    .context("storage.database_url or DATABASE_URL is required for postgres")?;

                let pg_config = PostgresConfig::new(url)
                    .with_max_connections(config.storage.max_connections);
                let store = PostgresDomainStore::connect(&pg_config).await?;
                store.ensure_schema().await?;

                info!("PostgreSQL domain store ready");
                Ok(Self::Postgres(Arc::new(store)))
            }
        }
    }

    pub fn store(&self) -> Arc<dyn DomainStore> {
        match self {
            Self::Memory(store) => Arc::clone(store) as Arc<dyn DomainStore>,
            Self::Postgres(store) => Arc::clone(store) as Arc<dyn DomainStore>,
        }
    }

    /// Release backend resources
    pub async fn close(&self) {
        if let Self::Postgres(store) = self {
            store.close().await;
            info!("PostgreSQL pool closed");
        }
    }
}

/// Build the services over one shared store
pub fn create_app_state(config: &AppConfig, store: Arc<dyn DomainStore>) -> AppState {
    let keys = Arc::new(SecureKeyGenerator::new(config.keys.dkim_key_bits));

    let mut manager = DomainManager::new(store.clone()).with_key_generator(keys);
    let mut authenticator = Authenticator::new(store);

    if let Some(timeout) = config.operations.timeout() {
        manager = manager.with_timeout(timeout);
        authenticator = authenticator.with_timeout(timeout);
    }

    if config.admin.api_token.is_none() {
        tracing::warn!("admin.api_token is not set; the admin API will reject every request");
    }

    AppState::new(Arc::new(manager), Arc::new(authenticator))
        .with_admin_token(config.admin.api_token.clone())
}
