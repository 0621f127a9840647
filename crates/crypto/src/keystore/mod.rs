//! EIP-2335 encrypted keystore decryption
//!
//! Recovers a validator's BLS12-381 secret key from the keystore format
//! produced by Ethereum staking tooling:
//!
//! - Password normalisation (NFKD, control characters stripped)
//! - scrypt or PBKDF2-HMAC-SHA256 key derivation
//! - SHA-256 checksum over `dk[16..32] || ciphertext`, compared in constant time
//! - AES-128-CTR decryption with `dk[0..16]`
//! - Public key cross-check against the keystore's `pubkey`
//!
//! # Example
//!
//! ```rust,ignore
//! use mevreg_crypto::keystore::EncryptedKeystore;
//!
//! let keystore = EncryptedKeystore::load("keystore-m_12381_3600_0_0_0.json")?;
//! let secret_key = keystore.decrypt(&password)?;
//! ```

mod checksum;
mod cipher;
mod encrypted;
mod error;
mod kdf;
mod password;

pub use checksum::{compute_checksum, ChecksumModule, ChecksumParams};
pub use cipher::{decrypt_secret, CipherModule, CipherParams};
#[cfg(any(test, feature = "test-utils"))]
pub use cipher::encrypt_secret;
pub use encrypted::{CryptoModule, EncryptedKeystore, KEYSTORE_VERSION};
#[cfg(any(test, feature = "test-utils"))]
pub use encrypted::KeystoreBuilder;
pub use error::{KeystoreError, KeystoreResult};
pub use kdf::{KdfModule, KdfParams};
pub use password::normalize_password;
