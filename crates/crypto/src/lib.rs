//! Cryptographic primitives for validator registration
//!
//! This crate provides:
//! - EIP-2335 keystore decryption (scrypt / pbkdf2, AES-128-CTR, SHA-256 checksum)
//! - BLS12-381 proof-of-possession signatures over freshly generated messages
//! - Secret containers that zeroize on drop and redact their `Debug` output

pub mod bls;
pub mod error;
pub mod keystore;
pub mod secure;
pub mod signing;

// BLS12-381 exports
pub use bls::{BlsPublicKey, BlsSecretKey, BlsSignature, DST_POP};

// Error exports
pub use error::{BlsError, SigningError};

// Secure memory exports
pub use secure::{ExposeSecret, IntoSecret, SecretArray, SecretBytes, SecretString};

// Keystore exports
pub use keystore::{EncryptedKeystore, KeystoreError, KeystoreResult};
#[cfg(any(test, feature = "test-utils"))]
pub use keystore::KeystoreBuilder;

// Signing exports
pub use signing::{
    random_message, sign, sign_and_check, sign_message, verify, verify_hex, SignaturePayload,
    MESSAGE_LENGTH,
};
