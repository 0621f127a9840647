//! AES-128-CTR cipher for keystore decryption
//!
//! The key is the first 16 bytes of the KDF output. CTR mode needs no
//! padding, so ciphertext and plaintext have equal length.

use aes::Aes128;
use cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};

use super::error::{decode_hex_field, KeystoreError, KeystoreResult};
use crate::secure::SecretBytes;

/// IV (initialization vector) length for AES-128-CTR
pub const IV_LENGTH: usize = 16;

/// AES-128 key length
pub const AES_KEY_LENGTH: usize = 16;

type Aes128Ctr = Ctr128BE<Aes128>;

/// Cipher module for EIP-2335 keystore
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CipherModule {
    /// Cipher function identifier ("aes-128-ctr")
    pub function: String,
    /// Cipher parameters
    pub params: CipherParams,
    /// Encrypted message as hex string
    pub message: String,
}

impl CipherModule {
    /// Create a new AES-128-CTR cipher module
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new(iv: &[u8], ciphertext: &[u8]) -> Self {
        Self {
            function: "aes-128-ctr".to_string(),
            params: CipherParams {
                iv: hex::encode(iv),
            },
            message: hex::encode(ciphertext),
        }
    }

    /// Get the ciphertext bytes
    pub fn ciphertext(&self) -> KeystoreResult<Vec<u8>> {
        decode_hex_field("ciphertext", &self.message)
    }

    /// Decrypt the message with the derived key
    pub fn decrypt(&self, derived_key: &[u8]) -> KeystoreResult<SecretBytes> {
        if self.function != "aes-128-ctr" {
            return Err(KeystoreError::corrupt(format!(
                "unsupported cipher function: {}",
                self.function
            )));
        }
        let iv = self.params.iv()?;
        let ciphertext = self.ciphertext()?;
        decrypt_secret(&ciphertext, derived_key, &iv)
    }
}

/// Cipher parameters for AES-128-CTR
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CipherParams {
    /// Initialization vector as hex string
    pub iv: String,
}

impl CipherParams {
    /// Decode the IV, requiring exactly 16 bytes
    pub fn iv(&self) -> KeystoreResult<[u8; IV_LENGTH]> {
        let bytes = decode_hex_field("iv", &self.iv)?;
        bytes.as_slice().try_into().map_err(|_| {
            KeystoreError::corrupt(format!("IV must be {} bytes, got {}", IV_LENGTH, bytes.len()))
        })
    }
}

fn keystream(key: &[u8], iv: &[u8]) -> KeystoreResult<Aes128Ctr> {
    if key.len() < AES_KEY_LENGTH {
        return Err(KeystoreError::corrupt(format!(
            "cipher key must be at least {} bytes, got {}",
            AES_KEY_LENGTH,
            key.len()
        )));
    }
    Aes128Ctr::new_from_slices(&key[..AES_KEY_LENGTH], iv).map_err(|_| {
        KeystoreError::corrupt(format!("IV must be {} bytes, got {}", IV_LENGTH, iv.len()))
    })
}

/// Encrypt secret data using AES-128-CTR
#[cfg(any(test, feature = "test-utils"))]
pub fn encrypt_secret(secret: &[u8], encryption_key: &[u8], iv: &[u8]) -> KeystoreResult<Vec<u8>> {
    let mut cipher = keystream(encryption_key, iv)?;
    let mut ciphertext = secret.to_vec();
    cipher.apply_keystream(&mut ciphertext);
    Ok(ciphertext)
}

/// Decrypt secret data using AES-128-CTR
///
/// Only the first 16 bytes of `decryption_key` are used.
pub fn decrypt_secret(
    ciphertext: &[u8],
    decryption_key: &[u8],
    iv: &[u8],
) -> KeystoreResult<SecretBytes> {
    let mut cipher = keystream(decryption_key, iv)?;
    let mut plaintext = ciphertext.to_vec();
    cipher.apply_keystream(&mut plaintext);
    Ok(SecretBox::new(Box::new(plaintext)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let secret = b"my-secret-key-material-32-bytes!";
        let key = vec![0xAA; 32];
        let iv = vec![0xBB; 16];

        let ciphertext = encrypt_secret(secret, &key, &iv).unwrap();
        assert_eq!(ciphertext.len(), secret.len());
        assert_ne!(&ciphertext, secret);

        let decrypted = decrypt_secret(&ciphertext, &key, &iv).unwrap();
        assert_eq!(decrypted.expose_secret(), secret);
    }

    #[test]
    fn test_only_first_half_of_key_used() {
        let mut key_a = vec![0xAA; 32];
        let key_b = key_a.clone();
        key_a[16..].copy_from_slice(&[0x01; 16]);

        let c1 = encrypt_secret(b"secret", &key_a, &[0u8; 16]).unwrap();
        let c2 = encrypt_secret(b"secret", &key_b, &[0u8; 16]).unwrap();
        assert_eq!(c1, c2);
    }

    #[test]
    fn test_invalid_key_length() {
        let result = decrypt_secret(b"test", &[0xAA; 8], &[0xBB; 16]);
        assert!(matches!(result, Err(KeystoreError::CorruptKeystore(_))));
    }

    #[test]
    fn test_iv_must_be_sixteen_bytes() {
        let params = CipherParams {
            iv: hex::encode([0u8; 12]),
        };
        let err = params.iv().unwrap_err();
        assert!(err.to_string().contains("IV must be 16 bytes, got 12"));

        let result = decrypt_secret(b"test", &[0xAA; 32], &[0xBB; 8]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cipher_module_decrypt() {
        let key = vec![0x42; 32];
        let iv = [0xCC; 16];
        let ciphertext = encrypt_secret(&[7u8; 32], &key, &iv).unwrap();

        let module = CipherModule::new(&iv, &ciphertext);
        assert_eq!(module.function, "aes-128-ctr");
        assert_eq!(module.decrypt(&key).unwrap().expose_secret(), &vec![7u8; 32]);
    }

    #[test]
    fn test_unsupported_cipher_function() {
        let mut module = CipherModule::new(&[0u8; 16], &[0u8; 32]);
        module.function = "aes-256-gcm".to_string();
        let err = module.decrypt(&[0u8; 32]).unwrap_err();
        assert!(err.to_string().contains("unsupported cipher function"));
    }
}
