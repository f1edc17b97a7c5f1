//! Operator authentication for the admin API

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::infrastructure::keys::{secret_digest, secret_matches};

/// Extractor that requires the operator bearer token
///
/// `Authorization: Bearer <token>` is checked against the configured
/// `admin.api_token` by comparing fixed-size SHA-256 digests in constant time. With no token configured the admin API is
/// closed.
#[derive(Debug, Clone, Copy)]
pub struct RequireOperator;

impl FromRequestParts<AppState> for RequireOperator {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.admin_token() else {
            warn!("Admin request rejected: no admin token configured");
            return Err(ApiError::forbidden("Admin API is disabled"));
        };

        let presented = extract_bearer_token(&parts.headers)?;

        if !token_matches(presented, expected) {
            debug!("Admin request rejected: token mismatch");
            return Err(ApiError::unauthorized("Invalid admin token"));
        }

        Ok(RequireOperator)
    }
}

/// Neither the content nor the length of `expected` influences timing
fn token_matches(presented: &str, expected: &str) -> bool {
    secret_matches(presented, &secret_digest(expected))
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Admin token required. Provide 'Authorization: Bearer <token>'"))?
        .to_str()
        .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| ApiError::unauthorized("Expected a Bearer token"))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(ApiError::unauthorized("Expected a Bearer token"));
    }

    Ok(token.trim())
}
