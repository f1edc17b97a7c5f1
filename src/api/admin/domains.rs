//! Domain management admin endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireOperator;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::Domain;

/// Request to register a new domain
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDomainRequest {
    pub domain: String,
}

/// Domain as seen by operators. The DKIM private key is never included.
#[derive(Debug, Clone, Serialize)]
pub struct DomainResponse {
    pub domain: String,
    pub key: String,
    pub dkim_pub_key: String,
    pub dkim_dns_record: String,
}

impl From<&Domain> for DomainResponse {
    fn from(domain: &Domain) -> Self {
        Self {
            domain: domain.name().to_string(),
            key: domain.secret().to_string(),
            dkim_pub_key: domain.dkim_public_key().to_string(),
            dkim_dns_record: domain.dkim_dns_record(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetDomainResponse {
    pub domain: DomainResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListDomainsResponse {
    pub domains: Vec<DomainResponse>,
    pub total: usize,
}

/// GET /admin/domains
pub async fn list_domains(
    State(state): State<AppState>,
    _: RequireOperator,
) -> Result<Json<ListDomainsResponse>, ApiError> {
    debug!("Admin listing all domains");

    let domains = state.domain_manager.get_all_domains().await?;
    let domains: Vec<DomainResponse> = domains.iter().map(DomainResponse::from).collect();
    let total = domains.len();

    Ok(Json(ListDomainsResponse { domains, total }))
}

/// GET /admin/domains/{domain}
pub async fn get_domain(
    State(state): State<AppState>,
    _: RequireOperator,
    Path(domain): Path<String>,
) -> Result<Json<GetDomainResponse>, ApiError> {
    debug!(domain = %domain, "Admin getting domain");

    let found = state.domain_manager.find_domain(&domain).await?;

    Ok(Json(GetDomainResponse {
        domain: DomainResponse::from(&found),
    }))
}

/// POST /admin/domains
pub async fn create_domain(
    State(state): State<AppState>,
    _: RequireOperator,
    Json(request): Json<CreateDomainRequest>,
) -> Result<(StatusCode, Json<DomainResponse>), ApiError> {
    debug!(domain = %request.domain, "Admin creating domain");

    let created = state.domain_manager.create_domain(&request.domain).await?;

    Ok((StatusCode::CREATED, Json(DomainResponse::from(&created))))
}

/// POST /admin/domains/{domain}/regenerate-key
pub async fn regenerate_domain_key(
    State(state): State<AppState>,
    _: RequireOperator,
    Path(domain): Path<String>,
) -> Result<Json<DomainResponse>, ApiError> {
    debug!(domain = %domain, "Admin regenerating domain key");

    let updated = state.domain_manager.regenerate_domain_key(&domain).await?;

    Ok(Json(DomainResponse::from(&updated)))
}
