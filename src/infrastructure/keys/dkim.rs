//! DKIM RSA key pair generation

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::rngs::OsRng;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::RsaPrivateKey;

use crate::domain::{DkimKeyPair, DomainError};

pub const DEFAULT_DKIM_KEY_BITS: usize = 2048;
pub const MIN_DKIM_KEY_BITS: usize = 1024;
pub const MAX_DKIM_KEY_BITS: usize = 4096;

/// Generator for DKIM signing keys
#[derive(Debug, Clone)]
pub struct DkimKeyGenerator {
    key_bits: usize,
}

impl DkimKeyGenerator {
    /// Create a generator for RSA keys of `key_bits`, clamped to 1024..=4096
    pub fn new(key_bits: usize) -> Self {
        Self {
            key_bits: key_bits.clamp(MIN_DKIM_KEY_BITS, MAX_DKIM_KEY_BITS),
        }
    }

    pub fn key_bits(&self) -> usize {
        self.key_bits
    }

    /// Generate a matched key pair
    ///
    /// The public half is base64 DER SubjectPublicKeyInfo, ready for the
    /// `p=` tag of a DKIM TXT record. The private half is PKCS#8 PEM.
    pub fn generate(&self) -> Result<DkimKeyPair, DomainError> {
        let private_key = RsaPrivateKey::new(&mut OsRng, self.key_bits).map_err(|e| {
            DomainError::unavailable(format!("Failed to generate DKIM key: {}", e))
        })?;

        let public_der = private_key
            .to_public_key()
            .to_public_key_der()
            .map_err(|e| DomainError::internal(format!("Failed to encode DKIM public key: {}", e)))?;

        let private_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| DomainError::internal(format!("Failed to encode DKIM private key: {}", e)))?;

        Ok(DkimKeyPair {
            public_key: STANDARD.encode(public_der.as_bytes()),
            private_key: private_pem.to_string(),
        })
    }
}

impl Default for DkimKeyGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_DKIM_KEY_BITS)
    }
}
