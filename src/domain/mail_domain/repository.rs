//! Domain store trait

use async_trait::async_trait;

use super::entity::{Domain, DomainName};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Persistent storage for domain identities
///
/// Implementations enforce name uniqueness on `create` and make
/// `update_secret` atomic per domain. I/O failures map to
/// `DomainError::Unavailable`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DomainStore: Send + Sync {
    /// Insert a new domain, failing with `AlreadyExists` on a name clash
    async fn create(&self, domain: Domain) -> Result<Domain, DomainError>;

    /// Exact lookup by normalized name
    async fn get_by_name(&self, name: &DomainName) -> Result<Option<Domain>, DomainError>;

    /// Snapshot of every domain in insertion order
    async fn get_all(&self) -> Result<Vec<Domain>, DomainError>;

    /// Replace the secret of an existing domain, failing with `NotFound`
    async fn update_secret(&self, name: &DomainName, secret: &str) -> Result<Domain, DomainError>;
}

