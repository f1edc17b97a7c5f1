//! Mail domain
//!
//! Tenant identities: domain names, API secrets and DKIM key pairs,
//! plus the store capability the lifecycle services persist through.

mod entity;
mod repository;
mod tenant;
mod validation;

pub use entity::{DkimKeyPair, Domain, DomainName};
pub use repository::DomainStore;
pub use tenant::TenantContext;
pub use validation::{normalize_domain_name, validate_domain_name, DomainNameValidationError};

#[cfg(test)]
pub use repository::MockDomainStore;
