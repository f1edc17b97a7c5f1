//! Domain layer - core entities, traits, and errors

pub mod error;
pub mod mail_domain;

pub use error::DomainError;
pub use mail_domain::{DkimKeyPair, Domain, DomainName, DomainStore, TenantContext};

#[cfg(test)]
pub use mail_domain::MockDomainStore;
