//! Admin API endpoints for operators

pub mod domains;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/domains", get(domains::list_domains))
        .route("/domains", post(domains::create_domain))
        .route("/domains/{domain}", get(domains::get_domain))
        .route(
            "/domains/{domain}/regenerate-key",
            post(domains::regenerate_domain_key),
        )
}
