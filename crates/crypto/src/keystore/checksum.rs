//! SHA-256 checksum for keystore integrity verification
//!
//! The checksum is computed over: decryption_key[16:32] || ciphertext
//! A mismatch means the password was wrong.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::error::{decode_hex_field, KeystoreError, KeystoreResult};

/// Checksum module for EIP-2335 keystore
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChecksumModule {
    /// Checksum function identifier ("sha256")
    pub function: String,
    /// Empty params (sha256 has no params)
    #[serde(default)]
    pub params: ChecksumParams,
    /// Checksum value as hex string
    pub message: String,
}

impl ChecksumModule {
    /// Create a new SHA-256 checksum module
    pub fn new(checksum: &[u8]) -> Self {
        Self {
            function: "sha256".to_string(),
            params: ChecksumParams {},
            message: hex::encode(checksum),
        }
    }

    /// Get the checksum bytes
    pub fn checksum(&self) -> KeystoreResult<Vec<u8>> {
        decode_hex_field("checksum", &self.message)
    }

    /// Check the stored checksum against `derived_key` and `ciphertext`
    ///
    /// Returns `InvalidPassword` on mismatch.
    pub fn verify(&self, derived_key: &[u8], ciphertext: &[u8]) -> KeystoreResult<()> {
        if self.function != "sha256" {
            return Err(KeystoreError::corrupt(format!(
                "unsupported checksum function: {}",
                self.function
            )));
        }

        let expected = self.checksum()?;
        let computed = compute_checksum(derived_key, ciphertext)?;

        // Length mismatch short-circuits to false inside ct_eq
        if bool::from(computed.as_slice().ct_eq(expected.as_slice())) {
            Ok(())
        } else {
            Err(KeystoreError::InvalidPassword)
        }
    }
}

/// Empty params struct for SHA-256 (required by EIP-2335 schema)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChecksumParams {}

/// Compute checksum over derived_key[16:32] || ciphertext
pub fn compute_checksum(derived_key: &[u8], ciphertext: &[u8]) -> KeystoreResult<[u8; 32]> {
    if derived_key.len() < 32 {
        return Err(KeystoreError::corrupt(format!(
            "derived key must be at least 32 bytes, got {}",
            derived_key.len()
        )));
    }

    let mut hasher = Sha256::new();
    hasher.update(&derived_key[16..32]);
    hasher.update(ciphertext);

    Ok(hasher.finalize().into())
}
