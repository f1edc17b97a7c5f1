//! Domain manager
//!
//! Orchestrates the domain lifecycle: creation with fresh key material,
//! lookup, listing and secret rotation.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::domain::{DkimKeyPair, Domain, DomainError, DomainName, DomainStore};
use crate::infrastructure::keys::{KeyGenerator, SecureKeyGenerator};
use crate::infrastructure::observability::{record_domain_created, record_domain_key_regenerated};

use super::deadline::bounded;

/// Domain lifecycle service
pub struct DomainManager {
    store: Arc<dyn DomainStore>,
    keys: Arc<dyn KeyGenerator>,
    timeout: Option<Duration>,
}

impl DomainManager {
    /// Create a manager over `store` using OS-random key material
    pub fn new(store: Arc<dyn DomainStore>) -> Self {
        Self {
            store,
            keys: Arc::new(SecureKeyGenerator::default()),
            timeout: None,
        }
    }

    /// Create with a custom key generator
    pub fn with_key_generator(mut self, keys: Arc<dyn KeyGenerator>) -> Self {
        self.keys = keys;
        self
    }

    /// Bound every operation by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Register a new domain with a generated secret and DKIM key pair
    pub async fn create_domain(&self, name: &str) -> Result<Domain, DomainError> {
        bounded(self.timeout, "create_domain", async {
            let name =
                DomainName::new(name).map_err(|e| DomainError::invalid_name(e.to_string()))?;
            info!(domain = %name, "Creating domain");

            let (secret, dkim) = self.generate_credentials().await?;
            let created = self.store.create(Domain::new(name, secret, dkim)).await?;

            record_domain_created();
            info!(domain = %created.name(), "Domain created");

            Ok(created)
        })
        .await
    }

    /// Exact lookup by name
    pub async fn find_domain(&self, name: &str) -> Result<Domain, DomainError> {
        bounded(self.timeout, "find_domain", async {
            // A name that cannot be registered cannot be found either
            let Ok(name) = DomainName::new(name) else {
                return Err(not_found(name));
            };

            self.store
                .get_by_name(&name)
                .await?
                .ok_or_else(|| not_found(name.as_str()))
        })
        .await
    }

    /// Snapshot of every registered domain in insertion order
    pub async fn get_all_domains(&self) -> Result<Vec<Domain>, DomainError> {
        bounded(self.timeout, "get_all_domains", async {
            let domains = self.store.get_all().await?;
            debug!(count = domains.len(), "Listed domains");
            Ok(domains)
        })
        .await
    }

    /// Replace a domain's secret; DKIM keys are left untouched
    pub async fn regenerate_domain_key(&self, name: &str) -> Result<Domain, DomainError> {
        bounded(self.timeout, "regenerate_domain_key", async {
            let Ok(name) = DomainName::new(name) else {
                return Err(not_found(name));
            };
            info!(domain = %name, "Regenerating domain key");

            let secret = self.keys.generate_secret()?;
            let updated = self.store.update_secret(&name, &secret).await?;

            record_domain_key_regenerated();
            info!(domain = %updated.name(), "Domain key regenerated");

            Ok(updated)
        })
        .await
    }

    async fn generate_credentials(&self) -> Result<(String, DkimKeyPair), DomainError> {
        let keys = Arc::clone(&self.keys);

        // RSA generation is CPU-bound
        tokio::task::spawn_blocking(move || -> Result<_, DomainError> {
            let secret = keys.generate_secret()?;
            let dkim = keys.generate_signing_key_pair()?;
            Ok((secret, dkim))
        })
        .await
        .map_err(|e| DomainError::internal(format!("Key generation task failed: {}", e)))?
    }
}

impl std::fmt::Debug for DomainManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainManager")
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn not_found(name: &str) -> DomainError {
    DomainError::not_found(format!("Domain '{}' not found", name))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::MockDomainStore;
    use crate::infrastructure::domain_store::InMemoryDomainStore;
    use crate::infrastructure::keys::fixed::{BrokenKeyGenerator, SequentialKeyGenerator};

    fn create_manager() -> DomainManager {
        let store = Arc::new(InMemoryDomainStore::new());
        DomainManager::new(store).with_key_generator(Arc::new(SequentialKeyGenerator::new()))
    }

    #[tokio::test]
    async fn test_create_domain() {
        let manager = create_manager();

        let domain = manager.create_domain("foo.test").await.unwrap();

        assert_eq!(domain.name().as_str(), "foo.test");
        assert!(!domain.secret().is_empty());
        assert!(!domain.dkim_public_key().is_empty());
        assert!(!domain.dkim_private_key().is_empty());
    }

    #[tokio::test]
    async fn test_create_then_find_has_credentials() {
        let manager = create_manager();
        manager.create_domain("foo.test").await.unwrap();

        let found = manager.find_domain("foo.test").await.unwrap();

        assert!(!found.secret().is_empty());
        assert!(!found.dkim_public_key().is_empty());
        assert!(!found.dkim_private_key().is_empty());
    }

    #[tokio::test]
    async fn test_create_normalizes_name() {
        let manager = create_manager();

        let domain = manager.create_domain("  Foo.TEST. ").await.unwrap();
        assert_eq!(domain.name().as_str(), "foo.test");

        let found = manager.find_domain("FOO.test").await.unwrap();
        assert_eq!(found.secret(), domain.secret());
    }

    #[tokio::test]
    async fn test_create_invalid_name() {
        let manager = create_manager();

        for name in ["", "localhost", "foo_bar.test", "-foo.test", "foo..test"] {
            let result = manager.create_domain(name).await;
            assert!(
                matches!(result, Err(DomainError::InvalidName { .. })),
                "expected InvalidName for {:?}",
                name
            );
        }
    }

    #[tokio::test]
    async fn test_create_duplicate_keeps_original() {
        let manager = create_manager();
        let original = manager.create_domain("foo.test").await.unwrap();

        let result = manager.create_domain("Foo.Test").await;
        assert!(matches!(result, Err(DomainError::AlreadyExists { .. })));

        let stored = manager.find_domain("foo.test").await.unwrap();
        assert_eq!(stored.secret(), original.secret());
        assert_eq!(stored.dkim_public_key(), original.dkim_public_key());
        assert_eq!(stored.dkim_private_key(), original.dkim_private_key());
    }

    #[tokio::test]
    async fn test_find_missing_domain() {
        let manager = create_manager();

        let result = manager.find_domain("bar.test").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));

        let result = manager.find_domain("not a domain").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_all_domains() {
        let manager = create_manager();
        let names = ["a.test", "b.test", "c.test"];

        for name in names {
            manager.create_domain(name).await.unwrap();
        }
        let _ = manager.create_domain("a.test").await;

        let all = manager.get_all_domains().await.unwrap();
        let listed: Vec<&str> = all.iter().map(|d| d.name().as_str()).collect();

        assert_eq!(listed, names);
    }

    #[tokio::test]
    async fn test_regenerate_changes_secret_only() {
        let manager = create_manager();
        let original = manager.create_domain("foo.test").await.unwrap();

        let updated = manager.regenerate_domain_key("foo.test").await.unwrap();

        assert_ne!(updated.secret(), original.secret());
        assert_eq!(updated.dkim_public_key(), original.dkim_public_key());
        assert_eq!(updated.dkim_private_key(), original.dkim_private_key());

        let stored = manager.find_domain("foo.test").await.unwrap();
        assert_eq!(stored.secret(), updated.secret());
    }

    #[tokio::test]
    async fn test_regenerate_missing_domain() {
        let manager = create_manager();

        let result = manager.regenerate_domain_key("bar.test").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_concurrent_regenerations_leave_one_secret() {
        let manager = Arc::new(create_manager());
        manager.create_domain("foo.test").await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = Arc::clone(&manager);
                tokio::spawn(async move { manager.regenerate_domain_key("foo.test").await })
            })
            .collect();

        let mut issued = HashSet::new();
        for handle in handles {
            issued.insert(handle.await.unwrap().unwrap().secret().to_string());
        }

        assert_eq!(issued.len(), 8);
        let stored = manager.find_domain("foo.test").await.unwrap();
        assert!(issued.contains(stored.secret()));
    }

    #[tokio::test]
    async fn test_randomness_failure_is_unavailable() {
        let store = Arc::new(InMemoryDomainStore::new());
        let manager =
            DomainManager::new(store.clone()).with_key_generator(Arc::new(BrokenKeyGenerator));

        let result = manager.create_domain("foo.test").await;

        assert!(matches!(result, Err(DomainError::Unavailable { .. })));
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_errors_surface_unchanged() {
        let mut store = MockDomainStore::new();
        store
            .expect_create()
            .returning(|_| Err(DomainError::unavailable("connection refused")));
        store
            .expect_get_all()
            .returning(|| Err(DomainError::unavailable("connection refused")));

        let manager = DomainManager::new(Arc::new(store))
            .with_key_generator(Arc::new(SequentialKeyGenerator::new()));

        let created = manager.create_domain("foo.test").await;
        assert_eq!(created, Err(DomainError::unavailable("connection refused")));
        assert!(created.unwrap_err().is_retryable());

        let listed = manager.get_all_domains().await;
        assert_eq!(listed, Err(DomainError::unavailable("connection refused")));
    }

    #[tokio::test]
    async fn test_store_uniqueness_violation_is_already_exists() {
        let mut store = MockDomainStore::new();
        store
            .expect_create()
            .times(1)
            .returning(|d| Err(DomainError::already_exists(format!("{} taken", d.name()))));

        let manager = DomainManager::new(Arc::new(store))
            .with_key_generator(Arc::new(SequentialKeyGenerator::new()));

        let result = manager.create_domain("foo.test").await;
        assert!(matches!(result, Err(DomainError::AlreadyExists { .. })));
    }

    #[derive(Debug, Default)]
    struct StalledStore {
        inner: InMemoryDomainStore,
    }

    #[async_trait]
    impl DomainStore for StalledStore {
        async fn create(&self, domain: Domain) -> Result<Domain, DomainError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            self.inner.create(domain).await
        }

        async fn get_by_name(&self, name: &DomainName) -> Result<Option<Domain>, DomainError> {
            self.inner.get_by_name(name).await
        }

        async fn get_all(&self) -> Result<Vec<Domain>, DomainError> {
            self.inner.get_all().await
        }

        async fn update_secret(
            &self,
            name: &DomainName,
            secret: &str,
        ) -> Result<Domain, DomainError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            self.inner.update_secret(name, secret).await
        }
    }

    #[tokio::test]
    async fn test_timed_out_create_is_cancelled_and_not_committed() {
        let store = Arc::new(StalledStore::default());
        let manager = DomainManager::new(store.clone())
            .with_key_generator(Arc::new(SequentialKeyGenerator::new()))
            .with_timeout(Duration::from_millis(50));

        let result = manager.create_domain("foo.test").await;

        assert!(matches!(result, Err(DomainError::Cancelled { .. })));
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_timed_out_regenerate_keeps_old_secret() {
        let inner = InMemoryDomainStore::new();
        let original = Domain::new(
            DomainName::new("foo.test").unwrap(),
            "original",
            DkimKeyPair {
                public_key: "pub".to_string(),
                private_key: "priv".to_string(),
            },
        );
        inner.create(original).await.unwrap();

        let manager = DomainManager::new(Arc::new(StalledStore { inner }))
            .with_key_generator(Arc::new(SequentialKeyGenerator::new()))
            .with_timeout(Duration::from_millis(50));

        let result = manager.regenerate_domain_key("foo.test").await;
        assert!(matches!(result, Err(DomainError::Cancelled { .. })));

        let stored = manager.find_domain("foo.test").await.unwrap();
        assert_eq!(stored.secret(), "original");
    }
}
