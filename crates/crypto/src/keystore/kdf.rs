//! Key Derivation Function (KDF) implementation
//!
//! Implements the two KDFs allowed by EIP-2335: scrypt (memory-hard) and
//! PBKDF2-HMAC-SHA256. Parameters are taken verbatim from the keystore.

use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecretMut, SecretBox};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::error::{decode_hex_field, KeystoreError, KeystoreResult};
use crate::secure::SecretBytes;

/// Minimum derived key length: 16 bytes of cipher key + 16 bytes of checksum key
pub const MIN_DKLEN: u32 = 32;

/// The only PRF EIP-2335 allows for PBKDF2
pub const PBKDF2_PRF: &str = "hmac-sha256";

/// KDF module for EIP-2335 keystore
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KdfModule {
    /// KDF function identifier ("scrypt" or "pbkdf2")
    pub function: String,
    /// KDF parameters
    pub params: KdfParams,
    /// Empty message field (required by EIP-2335 schema)
    #[serde(default)]
    pub message: String,
}

impl KdfModule {
    /// Create a scrypt KDF module
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_scrypt(salt: &[u8], n: u32) -> Self {
        Self {
            function: "scrypt".to_string(),
            params: KdfParams::Scrypt {
                dklen: MIN_DKLEN,
                n,
                r: 8,
                p: 1,
                salt: hex::encode(salt),
            },
            message: String::new(),
        }
    }

    /// Create a PBKDF2-HMAC-SHA256 KDF module
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_pbkdf2(salt: &[u8], c: u32) -> Self {
        Self {
            function: "pbkdf2".to_string(),
            params: KdfParams::Pbkdf2 {
                dklen: MIN_DKLEN,
                c,
                prf: PBKDF2_PRF.to_string(),
                salt: hex::encode(salt),
            },
            message: String::new(),
        }
    }

    /// Derive the decryption key from an already-normalised password
    pub fn derive_key(&self, password: &[u8]) -> KeystoreResult<SecretBytes> {
        self.params.validate()?;

        match (self.function.as_str(), &self.params) {
            (
                "scrypt",
                KdfParams::Scrypt {
                    dklen,
                    n,
                    r,
                    p,
                    salt,
                },
            ) => {
                let salt = decode_hex_field("kdf salt", salt)?;
                tracing::debug!(n, r, p, "deriving keystore key with scrypt");
                scrypt_derive_key(password, &salt, *n, *r, *p, *dklen as usize)
            }
            (
                "pbkdf2",
                KdfParams::Pbkdf2 {
                    dklen, c, salt, ..
                },
            ) => {
                let salt = decode_hex_field("kdf salt", salt)?;
                tracing::debug!(c, "deriving keystore key with pbkdf2");
                Ok(pbkdf2_derive_key(password, &salt, *c, *dklen as usize))
            }
            (function @ ("scrypt" | "pbkdf2"), _) => Err(KeystoreError::corrupt(format!(
                "kdf parameters do not match function {}",
                function
            ))),
            (other, _) => Err(KeystoreError::corrupt(format!(
                "unsupported kdf function: {}",
                other
            ))),
        }
    }
}

/// KDF parameters supporting different algorithms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum KdfParams {
    /// scrypt parameters
    Scrypt {
        /// Derived key length in bytes
        dklen: u32,
        /// CPU/memory cost parameter (must be power of 2)
        n: u32,
        /// Block size parameter
        r: u32,
        /// Parallelization parameter
        p: u32,
        /// Salt as hex string
        salt: String,
    },
    /// PBKDF2 parameters
    Pbkdf2 {
        /// Derived key length in bytes
        dklen: u32,
        /// Iteration count
        c: u32,
        /// Pseudo-random function, always "hmac-sha256"
        prf: String,
        /// Salt as hex string
        salt: String,
    },
}

impl KdfParams {
    /// Validate the parameters
    pub fn validate(&self) -> KeystoreResult<()> {
        match self {
            KdfParams::Scrypt {
                dklen, n, r, p, ..
            } => {
                check_dklen(*dklen)?;
                if *n < 2 || !n.is_power_of_two() {
                    return Err(KeystoreError::corrupt(
                        "scrypt n must be a power of 2 greater than 1",
                    ));
                }
                if *r == 0 || *p == 0 {
                    return Err(KeystoreError::corrupt("scrypt r and p must be positive"));
                }
                Ok(())
            }
            KdfParams::Pbkdf2 { dklen, c, prf, .. } => {
                check_dklen(*dklen)?;
                if *c == 0 {
                    return Err(KeystoreError::corrupt("pbkdf2 c must be positive"));
                }
                if prf != PBKDF2_PRF {
                    return Err(KeystoreError::corrupt(format!(
                        "unsupported pbkdf2 prf: {}",
                        prf
                    )));
                }
                Ok(())
            }
        }
    }
}

fn check_dklen(dklen: u32) -> KeystoreResult<()> {
    if dklen < MIN_DKLEN {
        return Err(KeystoreError::corrupt(format!(
            "kdf dklen must be at least {}, got {}",
            MIN_DKLEN, dklen
        )));
    }
    Ok(())
}

/// Derive a key using scrypt
///
/// `n` must already be validated as a power of two.
pub fn scrypt_derive_key(
    password: &[u8],
    salt: &[u8],
    n: u32,
    r: u32,
    p: u32,
    dklen: usize,
) -> KeystoreResult<SecretBytes> {
    let log_n = n.trailing_zeros() as u8;

    let params = scrypt::Params::new(log_n, r, p, dklen)
        .map_err(|e| KeystoreError::corrupt(format!("invalid scrypt parameters: {}", e)))?;

    let mut output = SecretBox::new(Box::new(vec![0u8; dklen]));
    scrypt::scrypt(password, salt, &params, output.expose_secret_mut())
        .map_err(|e| KeystoreError::corrupt(format!("scrypt failed: {}", e)))?;

    Ok(output)
}

/// Derive a key using PBKDF2-HMAC-SHA256
pub fn pbkdf2_derive_key(password: &[u8], salt: &[u8], c: u32, dklen: usize) -> SecretBytes {
    let mut output = SecretBox::new(Box::new(vec![0u8; dklen]));
    pbkdf2_hmac::<Sha256>(password, salt, c, output.expose_secret_mut());
    output
}
