//! Cryptographic error types

use thiserror::Error;

/// BLS12-381 cryptographic errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlsError {
    /// Invalid secret key bytes
    #[error("invalid secret key bytes")]
    InvalidSecretKey,

    /// Invalid public key bytes
    #[error("invalid public key bytes")]
    InvalidPublicKey,

    /// Invalid signature bytes
    #[error("invalid signature bytes")]
    InvalidSignature,
}

/// Errors raised while producing or checking a registration signature
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// A freshly produced signature did not verify against its own public key.
    ///
    /// This points at a broken BLS backend or a mismatched ciphersuite, never at
    /// operator input.
    #[error("signature self-check failed: the BLS backend produced a signature it cannot verify")]
    SignatureMismatch,

    /// A caller-supplied (public key, message, signature) triple does not verify.
    #[error("signature is not valid for the given public key and message")]
    InvalidSignature,

    /// A field of a caller-supplied triple has the wrong byte length.
    #[error("{field} must be {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A hex field could not be decoded.
    #[error("invalid hex in {field}: {reason}")]
    InvalidHex {
        field: &'static str,
        reason: String,
    },
}
