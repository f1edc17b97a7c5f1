//! Tenant context produced by authentication

use super::entity::DomainName;

/// Identity of an authenticated Mail API caller
///
/// Every downstream read or write for the request is scoped to `domain`.
/// Only the authenticator constructs one, from the record it just verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    domain: DomainName,
    dkim_public_key: String,
}

impl TenantContext {
    pub(crate) fn new(domain: DomainName, dkim_public_key: impl Into<String>) -> Self {
        Self {
            domain,
            dkim_public_key: dkim_public_key.into(),
        }
    }

    pub fn domain(&self) -> &DomainName {
        &self.domain
    }

    /// DKIM public key of the verified record
    pub fn dkim_public_key(&self) -> &str {
        &self.dkim_public_key
    }
}
