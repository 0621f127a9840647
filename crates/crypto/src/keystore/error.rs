//! Keystore error types

use thiserror::Error;

/// Errors that can occur while loading or decrypting a keystore
///
/// Messages never contain password or key material.
#[derive(Error, Debug)]
pub enum KeystoreError {
    /// The checksum did not match: the password is wrong.
    ///
    /// Recoverable by asking for the password again.
    #[error("invalid password: keystore checksum verification failed")]
    InvalidPassword,

    /// The keystore violates the schema, uses an unsupported function, or
    /// decrypts to a key whose public key differs from `pubkey`.
    #[error("corrupt keystore: {0}")]
    CorruptKeystore(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KeystoreError {
    /// Build a `CorruptKeystore` error from anything printable
    pub fn corrupt(reason: impl std::fmt::Display) -> Self {
        Self::CorruptKeystore(reason.to_string())
    }

    /// Whether a retry with a different password could succeed
    pub fn is_invalid_password(&self) -> bool {
        matches!(self, Self::InvalidPassword)
    }
}

impl From<serde_json::Error> for KeystoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::CorruptKeystore(format!("malformed keystore JSON: {}", e))
    }
}

/// Result type for keystore operations
pub type KeystoreResult<T> = Result<T, KeystoreError>;

/// Decode a hex field, mapping failures to `CorruptKeystore`
pub(crate) fn decode_hex_field(field: &str, value: &str) -> KeystoreResult<Vec<u8>> {
    hex::decode(value.trim_start_matches("0x"))
        .map_err(|e| KeystoreError::corrupt(format!("invalid {} hex: {}", field, e)))
}
