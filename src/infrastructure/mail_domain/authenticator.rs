//! Mail API authentication
//!
//! Resolves an `Authorization: Basic base64(domain:secret)` header to a
//! [`TenantContext`]. Every failure that depends on the credential itself
//! (malformed header, unknown domain, wrong secret) yields the same
//! `DomainError::Unauthenticated`.

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;

use crate::domain::{DomainError, DomainName, DomainStore, TenantContext};
use crate::infrastructure::keys::{secret_digest, secret_matches};
use crate::infrastructure::observability::record_auth_attempt;

use super::deadline::bounded;

/// Stands in for the stored secret when the domain is unknown, so both
/// rejection paths hash and compare the same amount of data.
const UNKNOWN_DOMAIN_SECRET: &str = "unknown-domain-placeholder-secret-value";

/// Domain name and secret decoded from a Basic credential
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredential {
    pub domain: String,
    pub secret: String,
}

impl BasicCredential {
    pub fn new(domain: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            secret: secret.into(),
        }
    }

    /// Decode an `Authorization` header value
    pub fn decode(header: &str) -> Result<Self, DomainError> {
        let (scheme, token) = header
            .trim()
            .split_once(' ')
            .ok_or_else(DomainError::unauthenticated)?;

        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(DomainError::unauthenticated());
        }

        let decoded = STANDARD
            .decode(token.trim())
            .map_err(|_| DomainError::unauthenticated())?;
        let decoded = String::from_utf8(decoded).map_err(|_| DomainError::unauthenticated())?;

        // Domain names never contain ':', so the first one is the separator
        let (domain, secret) = decoded
            .split_once(':')
            .ok_or_else(DomainError::unauthenticated)?;

        if domain.is_empty() || secret.is_empty() {
            return Err(DomainError::unauthenticated());
        }

        Ok(Self::new(domain, secret))
    }
}

#[cfg(test)]
impl BasicCredential {
    /// Encode as an `Authorization` header value
    pub fn to_header_value(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.domain, self.secret));
        format!("Basic {}", token)
    }
}

impl std::fmt::Debug for BasicCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredential")
            .field("domain", &self.domain)
            .field("secret", &"[hidden]")
            .finish()
    }
}

/// Validates Mail API credentials against the domain store
///
/// Reads the store on every call; a rotated secret is effective for the very
/// next request.
pub struct Authenticator {
    store: Arc<dyn DomainStore>,
    timeout: Option<Duration>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn DomainStore>) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    /// Bound every authentication by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Authenticate the raw `Authorization` header, if any
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<TenantContext, DomainError> {
        let result = bounded(self.timeout, "authenticate", self.verify(authorization)).await;

        match &result {
            Ok(tenant) => {
                record_auth_attempt("success");
                debug!(domain = %tenant.domain(), "Authenticated mail API request");
            }
            Err(DomainError::Unauthenticated) => {
                record_auth_attempt("rejected");
                debug!("Rejected mail API credentials");
            }
            Err(e) => {
                record_auth_attempt("error");
                debug!(error = %e, "Authentication could not complete");
            }
        }

        result
    }

    async fn verify(&self, authorization: Option<&str>) -> Result<TenantContext, DomainError> {
        let header = authorization.ok_or_else(DomainError::unauthenticated)?;
        let credential = BasicCredential::decode(header)?;

        let stored = match DomainName::new(&credential.domain) {
            Ok(name) => self.store.get_by_name(&name).await?,
            Err(_) => None,
        };

        let stored_digest = match &stored {
            Some(domain) => secret_digest(domain.secret()),
            None => secret_digest(UNKNOWN_DOMAIN_SECRET),
        };
        let matches = secret_matches(&credential.secret, &stored_digest);

        match stored {
            Some(domain) if matches => Ok(TenantContext::new(
                domain.name().clone(),
                domain.dkim_public_key(),
            )),
            _ => Err(DomainError::unauthenticated()),
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockDomainStore;
    use crate::infrastructure::domain_store::InMemoryDomainStore;
    use crate::infrastructure::keys::fixed::SequentialKeyGenerator;
    use crate::infrastructure::mail_domain::DomainManager;

    fn basic(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    fn create_services() -> (DomainManager, Authenticator) {
        let store: Arc<dyn DomainStore> = Arc::new(InMemoryDomainStore::new());
        let manager = DomainManager::new(store.clone())
            .with_key_generator(Arc::new(SequentialKeyGenerator::new()));
        (manager, Authenticator::new(store))
    }

    #[test]
    fn test_decode_basic_credential() {
        let credential = BasicCredential::decode(&basic("foo.test:s3cret")).unwrap();

        assert_eq!(credential.domain, "foo.test");
        assert_eq!(credential.secret, "s3cret");
    }

    #[test]
    fn test_decode_splits_at_first_colon() {
        let credential = BasicCredential::decode(&basic("foo.test:a:b")).unwrap();

        assert_eq!(credential.domain, "foo.test");
        assert_eq!(credential.secret, "a:b");
    }

    #[test]
    fn test_decode_scheme_is_case_insensitive() {
        let header = format!("basic {}", STANDARD.encode("foo.test:x"));
        assert!(BasicCredential::decode(&header).is_ok());
    }

    #[test]
    fn test_decode_rejects_malformed() {
        let cases = [
            String::new(),
            "Basic".to_string(),
            "Bearer abc".to_string(),
            "Basic !!!not-base64!!!".to_string(),
            basic("no-separator"),
            basic(":secret-without-domain"),
            basic("foo.test:"),
            format!("Basic {}", STANDARD.encode([0xff, 0xfe, b':', b'x'])),
        ];

        for header in cases {
            assert_eq!(
                BasicCredential::decode(&header),
                Err(DomainError::Unauthenticated),
                "header {:?}",
                header
            );
        }
    }

    #[test]
    fn test_header_round_trip() {
        let credential = BasicCredential::new("foo.test", "s3cret");
        let header = credential.to_header_value();

        assert!(header.starts_with("Basic "));
        assert_eq!(BasicCredential::decode(&header).unwrap(), credential);
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", BasicCredential::new("foo.test", "s3cret"));
        assert!(!debug.contains("s3cret"));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let (manager, authenticator) = create_services();
        let domain = manager.create_domain("foo.test").await.unwrap();
        let header = BasicCredential::new("foo.test", domain.secret()).to_header_value();

        let tenant = authenticator.authenticate(Some(&header)).await.unwrap();

        assert_eq!(tenant.domain(), domain.name());
        assert_eq!(tenant.dkim_public_key(), domain.dkim_public_key());
    }

    #[tokio::test]
    async fn test_authenticate_normalizes_domain() {
        let (manager, authenticator) = create_services();
        let domain = manager.create_domain("foo.test").await.unwrap();
        let header = BasicCredential::new("FOO.Test", domain.secret()).to_header_value();

        let tenant = authenticator.authenticate(Some(&header)).await.unwrap();

        assert_eq!(tenant.domain().as_str(), "foo.test");
    }

    #[tokio::test]
    async fn test_unknown_domain_and_wrong_secret_are_indistinguishable() {
        let (manager, authenticator) = create_services();
        manager.create_domain("foo.test").await.unwrap();

        let unknown = BasicCredential::new("bar.test", "whatever").to_header_value();
        let wrong = BasicCredential::new("foo.test", "whatever").to_header_value();
        let unparsable = BasicCredential::new("not_a_domain", "whatever").to_header_value();

        let unknown = authenticator.authenticate(Some(&unknown)).await.unwrap_err();
        let wrong = authenticator.authenticate(Some(&wrong)).await.unwrap_err();
        let unparsable = authenticator.authenticate(Some(&unparsable)).await.unwrap_err();

        assert_eq!(unknown, DomainError::Unauthenticated);
        assert_eq!(unknown, wrong);
        assert_eq!(unknown, unparsable);
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_missing_header() {
        let (_, authenticator) = create_services();

        let result = authenticator.authenticate(None).await;
        assert_eq!(result, Err(DomainError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_rotation_takes_effect_immediately() {
        let (manager, authenticator) = create_services();
        let original = manager.create_domain("foo.test").await.unwrap();
        let old_header = BasicCredential::new("foo.test", original.secret()).to_header_value();

        assert!(authenticator.authenticate(Some(&old_header)).await.is_ok());

        let rotated = manager.regenerate_domain_key("foo.test").await.unwrap();
        let new_header = BasicCredential::new("foo.test", rotated.secret()).to_header_value();

        assert_eq!(
            authenticator.authenticate(Some(&old_header)).await,
            Err(DomainError::Unauthenticated)
        );
        assert!(authenticator.authenticate(Some(&new_header)).await.is_ok());
    }

    #[tokio::test]
    async fn test_secret_of_other_domain_is_rejected() {
        let (manager, authenticator) = create_services();
        manager.create_domain("foo.test").await.unwrap();
        let bar = manager.create_domain("bar.test").await.unwrap();

        let header = BasicCredential::new("foo.test", bar.secret()).to_header_value();

        assert_eq!(
            authenticator.authenticate(Some(&header)).await,
            Err(DomainError::Unauthenticated)
        );
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable() {
        let mut store = MockDomainStore::new();
        store
            .expect_get_by_name()
            .returning(|_| Err(DomainError::unavailable("connection refused")));
        let authenticator = Authenticator::new(Arc::new(store));

        let header = BasicCredential::new("foo.test", "x").to_header_value();
        let result = authenticator.authenticate(Some(&header)).await;

        assert!(matches!(result, Err(DomainError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_empty_header_is_rejected_without_store() {
        let mut store = MockDomainStore::new();
        store.expect_get_by_name().never();
        let authenticator = Authenticator::new(Arc::new(store));

        let result = authenticator.authenticate(Some("")).await;

        assert_eq!(result, Err(DomainError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_malformed_header_skips_store() {
        let mut store = MockDomainStore::new();
        store.expect_get_by_name().never();
        let authenticator = Authenticator::new(Arc::new(store));

        let result = authenticator.authenticate(Some("Basic %%%")).await;

        assert_eq!(result, Err(DomainError::Unauthenticated));
    }
}
