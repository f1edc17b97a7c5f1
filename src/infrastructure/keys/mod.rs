//! Key material generation
//!
//! Domain secrets and DKIM key pairs, both drawn from the OS CSPRNG.

mod dkim;
mod secret;

pub use dkim::{DkimKeyGenerator, DEFAULT_DKIM_KEY_BITS, MAX_DKIM_KEY_BITS, MIN_DKIM_KEY_BITS};
pub use secret::{secret_digest, secret_matches, SecretGenerator};

use crate::domain::{DkimKeyPair, DomainError};

/// Source of fresh key material for new and rotated domains
pub trait KeyGenerator: Send + Sync {
    /// A new opaque domain secret
    fn generate_secret(&self) -> Result<String, DomainError>;

    /// A new DKIM key pair; CPU-bound, callers run it off the async executor
    fn generate_signing_key_pair(&self) -> Result<DkimKeyPair, DomainError>;
}

/// Key generator backed by the OS randomness source
#[derive(Debug, Clone, Default)]
pub struct SecureKeyGenerator {
    secrets: SecretGenerator,
    dkim: DkimKeyGenerator,
}

impl SecureKeyGenerator {
    pub fn new(dkim_key_bits: usize) -> Self {
        Self {
            secrets: SecretGenerator::new(),
            dkim: DkimKeyGenerator::new(dkim_key_bits),
        }
    }
}

impl KeyGenerator for SecureKeyGenerator {
    fn generate_secret(&self) -> Result<String, DomainError> {
        self.secrets.generate()
    }

    fn generate_signing_key_pair(&self) -> Result<DkimKeyPair, DomainError> {
        self.dkim.generate()
    }
}
