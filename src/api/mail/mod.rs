//! Tenant-facing Mail API
//!
//! Every route here authenticates through `RequireTenant`.

pub mod domain;

use axum::{routing::get, Router};

use super::state::AppState;

pub fn create_mail_router() -> Router<AppState> {
    Router::new().route("/domain", get(domain::get_own_domain))
}
