//! The calling tenant's own domain

use serde::Serialize;

use crate::api::middleware::RequireTenant;
use crate::api::types::Json;

/// Public view of a tenant's domain
#[derive(Debug, Clone, Serialize)]
pub struct TenantDomainResponse {
    pub domain: String,
    pub dkim_pub_key: String,
}

/// GET /mail/v1/domain
///
/// Lets clients verify their credentials and fetch the DKIM public key.
/// Answers from the record the authenticator just verified.
pub async fn get_own_domain(RequireTenant(tenant): RequireTenant) -> Json<TenantDomainResponse> {
    Json(TenantDomainResponse {
        domain: tenant.domain().to_string(),
        dkim_pub_key: tenant.dkim_public_key().to_string(),
    })
}
