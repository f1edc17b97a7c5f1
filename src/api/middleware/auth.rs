//! Mail API authentication gate

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::TenantContext;

/// Extractor that requires valid domain credentials
///
/// Reads `Authorization: Basic base64(domain:secret)`. Every handler taking
/// this extractor is scoped to the resolved tenant; the handler never runs
/// for a rejected request.
#[derive(Debug, Clone)]
pub struct RequireTenant(pub TenantContext);

impl FromRequestParts<AppState> for RequireTenant {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A non-ASCII value decodes as empty and is rejected by the authenticator
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or_default());

        let tenant = state.authenticator.authenticate(header).await?;

        Ok(RequireTenant(tenant))
    }
}
