//! Application state for shared services

use std::sync::Arc;

use crate::domain::DomainStore;
use crate::infrastructure::mail_domain::{Authenticator, DomainManager};

/// Shared services handed to every handler
///
/// Manager and authenticator are built over the same store instance.
#[derive(Clone)]
pub struct AppState {
    pub domain_manager: Arc<DomainManager>,
    pub authenticator: Arc<Authenticator>,
    admin_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(domain_manager: Arc<DomainManager>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            domain_manager,
            authenticator,
            admin_token: None,
        }
    }

    /// Build manager and authenticator over one store with default key material
    pub fn with_store(store: Arc<dyn DomainStore>) -> Self {
        Self::new(
            Arc::new(DomainManager::new(store.clone())),
            Arc::new(Authenticator::new(store)),
        )
    }

    /// Set the operator bearer token; blank tokens are ignored
    pub fn with_admin_token(mut self, token: Option<String>) -> Self {
        self.admin_token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(Arc::from);
        self
    }

    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("domain_manager", &self.domain_manager)
            .field("authenticator", &self.authenticator)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}
