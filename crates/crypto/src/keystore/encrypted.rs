//! EIP-2335 EncryptedKeystore
//!
//! Combines the KDF, checksum and cipher modules into the decryption
//! pipeline. The encoder ([`KeystoreBuilder`]) only exists to build fixtures.

use std::fs;
use std::path::Path;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::checksum::ChecksumModule;
use super::cipher::CipherModule;
use super::error::{decode_hex_field, KeystoreError, KeystoreResult};
use super::kdf::KdfModule;
use super::password::normalize_password;
use crate::bls::{BlsPublicKey, BlsSecretKey};
use crate::secure::{SecretBytes, SecretString};

/// Version number for EIP-2335 keystores
pub const KEYSTORE_VERSION: u32 = 4;

/// EIP-2335 encrypted keystore
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedKeystore {
    /// Crypto parameters (KDF + checksum + cipher)
    pub crypto: CryptoModule,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Compressed BLS public key as hex string
    pub pubkey: String,
    /// EIP-2334 derivation path, may be empty
    #[serde(default)]
    pub path: String,
    /// Unique identifier
    pub uuid: String,
    /// Schema version
    pub version: u32,
}

/// Combined crypto parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoModule {
    /// Key derivation function parameters
    pub kdf: KdfModule,
    /// Checksum for password verification
    pub checksum: ChecksumModule,
    /// Cipher parameters and encrypted data
    pub cipher: CipherModule,
}

impl EncryptedKeystore {
    /// Parse a keystore from its JSON text
    pub fn from_json(json: &str) -> KeystoreResult<Self> {
        let keystore: Self = serde_json::from_str(json)?;
        if keystore.version != KEYSTORE_VERSION {
            return Err(KeystoreError::corrupt(format!(
                "unsupported keystore version {}, expected {}",
                keystore.version, KEYSTORE_VERSION
            )));
        }
        Ok(keystore)
    }

    /// Load a keystore from a file
    pub fn load<P: AsRef<Path>>(path: P) -> KeystoreResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let keystore = Self::from_json(&contents)?;
        tracing::debug!(path = %path.display(), uuid = %keystore.uuid, "loaded keystore");
        Ok(keystore)
    }

    /// Decrypt the keystore into a validator secret key
    ///
    /// The recovered key's public key must equal `pubkey`.
    pub fn decrypt(&self, password: &SecretString) -> KeystoreResult<BlsSecretKey> {
        let secret = self.decrypt_raw(password)?;

        let secret_key = BlsSecretKey::from_bytes(secret.expose_secret()).map_err(|_| {
            KeystoreError::corrupt(format!(
                "decrypted secret is not a valid BLS12-381 scalar ({} bytes)",
                secret.expose_secret().len()
            ))
        })?;

        let expected = self.public_key_bytes()?;
        if secret_key.public_key().to_bytes().as_slice() != expected.as_slice() {
            return Err(KeystoreError::corrupt(
                "decrypted key does not match the keystore pubkey",
            ));
        }

        tracing::info!(
            pubkey = %hex::encode(&expected[..8]),
            "keystore decrypted"
        );
        Ok(secret_key)
    }

    /// Decrypt the keystore and return the raw secret bytes
    ///
    /// The checksum is verified before anything is decrypted.
    pub fn decrypt_raw(&self, password: &SecretString) -> KeystoreResult<SecretBytes> {
        let password = normalize_password(password.expose_secret());
        let derived_key = self.crypto.kdf.derive_key(password.expose_secret())?;
        let dk_bytes = derived_key.expose_secret();

        let ciphertext = self.crypto.cipher.ciphertext()?;
        self.crypto.checksum.verify(dk_bytes, &ciphertext)?;

        self.crypto.cipher.decrypt(dk_bytes)
    }

    /// The declared public key, parsed and subgroup-checked
    pub fn public_key(&self) -> KeystoreResult<BlsPublicKey> {
        let bytes = self.public_key_bytes()?;
        BlsPublicKey::from_bytes(&bytes)
            .map_err(|e| KeystoreError::corrupt(format!("pubkey: {}", e)))
    }

    fn public_key_bytes(&self) -> KeystoreResult<Vec<u8>> {
        let bytes = decode_hex_field("pubkey", &self.pubkey)?;
        if bytes.len() != crate::bls::PUBLIC_KEY_LENGTH {
            return Err(KeystoreError::corrupt(format!(
                "pubkey must be {} bytes, got {}",
                crate::bls::PUBLIC_KEY_LENGTH,
                bytes.len()
            )));
        }
        Ok(bytes)
    }

    /// Get the UUID
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Get the public key hex
    pub fn pubkey(&self) -> &str {
        &self.pubkey
    }

    /// Get the description if present
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the derivation path
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Builder for encrypting a BLS secret key into a keystore
#[cfg(any(test, feature = "test-utils"))]
pub struct KeystoreBuilder<'a> {
    secret_key: &'a BlsSecretKey,
    password: String,
    kdf: Option<KdfModule>,
    iv: [u8; 16],
    description: Option<String>,
    path: String,
    uuid: Option<String>,
}

#[cfg(any(test, feature = "test-utils"))]
impl<'a> KeystoreBuilder<'a> {
    /// Start a builder for `secret_key`
    pub fn new(secret_key: &'a BlsSecretKey, password: &str) -> Self {
        use rand::RngCore;
        let mut iv = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut iv);
        Self {
            secret_key,
            password: password.to_string(),
            kdf: None,
            iv,
            description: None,
            path: String::new(),
            uuid: None,
        }
    }

    /// Use an explicit KDF module (default: scrypt with n = 2^14)
    pub fn kdf(mut self, kdf: KdfModule) -> Self {
        self.kdf = Some(kdf);
        self
    }

    /// Use an explicit IV
    pub fn iv(mut self, iv: [u8; 16]) -> Self {
        self.iv = iv;
        self
    }

    /// Set an optional description
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Set the derivation path
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Set a custom UUID (normally auto-generated)
    pub fn uuid(mut self, uuid: &str) -> Self {
        self.uuid = Some(uuid.to_string());
        self
    }

    /// Encrypt and assemble the keystore
    pub fn build(self) -> KeystoreResult<EncryptedKeystore> {
        use super::checksum::compute_checksum;
        use super::cipher::encrypt_secret;
        use rand::RngCore;

        let kdf = match self.kdf {
            Some(kdf) => kdf,
            None => {
                let mut salt = [0u8; 32];
                rand::thread_rng().fill_bytes(&mut salt);
                KdfModule::new_scrypt(&salt, 1 << 14)
            }
        };

        let password = normalize_password(&self.password);
        let derived_key = kdf.derive_key(password.expose_secret())?;
        let dk_bytes = derived_key.expose_secret();

        let ciphertext = encrypt_secret(self.secret_key.to_bytes().as_slice(), dk_bytes, &self.iv)?;
        let checksum = compute_checksum(dk_bytes, &ciphertext)?;

        Ok(EncryptedKeystore {
            crypto: CryptoModule {
                kdf,
                checksum: ChecksumModule::new(&checksum),
                cipher: CipherModule::new(&self.iv, &ciphertext),
            },
            description: self.description,
            name: None,
            pubkey: hex::encode(self.secret_key.public_key().to_bytes()),
            path: self.path,
            uuid: self
                .uuid
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            version: KEYSTORE_VERSION,
        })
    }
}
