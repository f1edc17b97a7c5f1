//! Domain secret generation and comparison
//!
//! Secrets are opaque bearer tokens drawn from the OS CSPRNG. They are
//! compared through their SHA-256 digests in constant time.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::domain::DomainError;

/// Random bytes per secret (256 bits)
const SECRET_BYTES: usize = 32;

/// Generator for domain secrets
#[derive(Debug, Clone, Default)]
pub struct SecretGenerator;

impl SecretGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a new secret
    ///
    /// Fails with `Unavailable` when the OS randomness source cannot be read.
    pub fn generate(&self) -> Result<String, DomainError> {
        let mut random_bytes = [0u8; SECRET_BYTES];
        OsRng.try_fill_bytes(&mut random_bytes).map_err(|e| {
            DomainError::unavailable(format!("Randomness source unavailable: {}", e))
        })?;

        Ok(URL_SAFE_NO_PAD.encode(&random_bytes))
    }
}

/// SHA-256 digest of a secret
pub fn secret_digest(secret: &str) -> [u8; 32] {
    Sha256::digest(secret.as_bytes()).into()
}

/// Constant-time check of a presented secret against a stored digest
///
/// Both sides are fixed-size digests, so neither content nor length of the
/// stored secret influences timing.
pub fn secret_matches(presented: &str, stored_digest: &[u8; 32]) -> bool {
    secret_digest(presented).ct_eq(stored_digest).into()
}
