//! In-memory domain store implementation

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{Domain, DomainError, DomainName, DomainStore};

#[derive(Debug, Default)]
struct Records {
    /// Names in insertion order
    order: Vec<DomainName>,
    by_name: HashMap<DomainName, Domain>,
}

/// Thread-safe in-memory domain store
///
/// Useful for testing and development. Data is lost when the process terminates.
/// Every operation runs under a single lock, so create and secret updates are
/// atomic.
#[derive(Debug, Default)]
pub struct InMemoryDomainStore {
    records: RwLock<Records>,
}

impl InMemoryDomainStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DomainStore for InMemoryDomainStore {
    async fn create(&self, domain: Domain) -> Result<Domain, DomainError> {
        let mut records = self.records.write().map_err(|e| {
            DomainError::unavailable(format!("Failed to acquire write lock: {}", e))
        })?;

        if records.by_name.contains_key(domain.name()) {
            return Err(DomainError::already_exists(format!(
                "Domain '{}' already exists",
                domain.name()
            )));
        }

        records.order.push(domain.name().clone());
        records.by_name.insert(domain.name().clone(), domain.clone());

        Ok(domain)
    }

    async fn get_by_name(&self, name: &DomainName) -> Result<Option<Domain>, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::unavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(records.by_name.get(name).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Domain>, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::unavailable(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(records
            .order
            .iter()
            .filter_map(|name| records.by_name.get(name).cloned())
            .collect())
    }

    async fn update_secret(&self, name: &DomainName, secret: &str) -> Result<Domain, DomainError> {
        let mut records = self.records.write().map_err(|e| {
            DomainError::unavailable(format!("Failed to acquire write lock: {}", e))
        })?;

        let domain = records
            .by_name
            .get_mut(name)
            .ok_or_else(|| DomainError::not_found(format!("Domain '{}' not found", name)))?;

        domain.set_secret(secret);

        Ok(domain.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DkimKeyPair;

    fn create_test_domain(name: &str) -> Domain {
        Domain::new(
            DomainName::new(name).unwrap(),
            format!("secret-{}", name),
            DkimKeyPair {
                public_key: format!("pub-{}", name),
                private_key: format!("priv-{}", name),
            },
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryDomainStore::new();
        let domain = create_test_domain("foo.test");

        store.create(domain.clone()).await.unwrap();

        let retrieved = store.get_by_name(domain.name()).await.unwrap();
        assert_eq!(retrieved, Some(domain));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = InMemoryDomainStore::new();
        let name = DomainName::new("missing.test").unwrap();

        assert!(store.get_by_name(&name).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_keeps_original() {
        let store = InMemoryDomainStore::new();
        let original = create_test_domain("foo.test");
        store.create(original.clone()).await.unwrap();

        let mut clash = create_test_domain("foo.test");
        clash.set_secret("other");
        let result = store.create(clash).await;

        assert!(matches!(result, Err(DomainError::AlreadyExists { .. })));
        let stored = store.get_by_name(original.name()).await.unwrap().unwrap();
        assert_eq!(stored.secret(), original.secret());
    }

    #[tokio::test]
    async fn test_get_all_insertion_order() {
        let store = InMemoryDomainStore::new();

        for name in ["c.test", "a.test", "b.test"] {
            store.create(create_test_domain(name)).await.unwrap();
        }

        let names: Vec<String> = store
            .get_all()
            .await
            .unwrap()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, vec!["c.test", "a.test", "b.test"]);
    }

    #[tokio::test]
    async fn test_update_secret() {
        let store = InMemoryDomainStore::new();
        let domain = create_test_domain("foo.test");
        store.create(domain.clone()).await.unwrap();

        let updated = store.update_secret(domain.name(), "rotated").await.unwrap();

        assert_eq!(updated.secret(), "rotated");
        assert_eq!(updated.dkim_public_key(), domain.dkim_public_key());
        assert_eq!(updated.dkim_private_key(), domain.dkim_private_key());

        let stored = store.get_by_name(domain.name()).await.unwrap().unwrap();
        assert_eq!(stored.secret(), "rotated");
    }

    #[tokio::test]
    async fn test_update_secret_missing() {
        let store = InMemoryDomainStore::new();
        let name = DomainName::new("missing.test").unwrap();

        let result = store.update_secret(&name, "x").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
