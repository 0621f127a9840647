//! Registration signatures
//!
//! The validator proves control of its key by signing a fresh random
//! message. The (public key, message, signature) triple travels as hex.

use serde::{Deserialize, Serialize};

use crate::bls::{BlsPublicKey, BlsSecretKey, BlsSignature, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use crate::error::SigningError;

/// Length of a registration message
pub const MESSAGE_LENGTH: usize = 16;

/// A signed registration message
///
/// Serializes every field as bare lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePayload {
    /// Compressed G1 public key (48 bytes)
    #[serde(with = "hex_bytes")]
    pub public_key: Vec<u8>,
    /// Signed message (16 bytes when produced by [`sign`])
    #[serde(with = "hex_bytes")]
    pub message: Vec<u8>,
    /// Compressed G2 signature (96 bytes)
    #[serde(with = "hex_bytes")]
    pub signature: Vec<u8>,
}

impl SignaturePayload {
    /// Parse from hex strings, with or without `0x`
    pub fn from_hex(public_key: &str, message: &str, signature: &str) -> Result<Self, SigningError> {
        Ok(Self {
            public_key: decode("public key", public_key)?,
            message: decode("message", message)?,
            signature: decode("signature", signature)?,
        })
    }

    /// Check that every field has the length the proxy contract expects
    pub fn check_lengths(&self) -> Result<(), SigningError> {
        for (field, bytes, expected) in [
            ("public key", &self.public_key, PUBLIC_KEY_LENGTH),
            ("message", &self.message, MESSAGE_LENGTH),
            ("signature", &self.signature, SIGNATURE_LENGTH),
        ] {
            if bytes.len() != expected {
                return Err(SigningError::InvalidLength {
                    field,
                    expected,
                    actual: bytes.len(),
                });
            }
        }
        Ok(())
    }

    /// Hex-encoded public key
    pub fn public_key_hex(&self) -> String {
        hex::encode(&self.public_key)
    }

    /// Hex-encoded message
    pub fn message_hex(&self) -> String {
        hex::encode(&self.message)
    }

    /// Hex-encoded signature
    pub fn signature_hex(&self) -> String {
        hex::encode(&self.signature)
    }
}

fn decode(field: &'static str, value: &str) -> Result<Vec<u8>, SigningError> {
    hex::decode(value.trim().trim_start_matches("0x")).map_err(|e| SigningError::InvalidHex {
        field,
        reason: e.to_string(),
    })
}

/// Generate a fresh registration message: a version-4 UUID's 16 bytes
pub fn random_message() -> [u8; MESSAGE_LENGTH] {
    *uuid::Uuid::new_v4().as_bytes()
}

/// Sign `message` with `key`
pub fn sign_message(key: &BlsSecretKey, message: &[u8]) -> SignaturePayload {
    let signature = key.sign(message);
    SignaturePayload {
        public_key: key.public_key().to_bytes().to_vec(),
        message: message.to_vec(),
        signature: signature.to_bytes().to_vec(),
    }
}

/// Sign a freshly generated random message
pub fn sign(key: &BlsSecretKey) -> SignaturePayload {
    sign_message(key, &random_message())
}

/// Check a payload; malformed points or lengths yield `false`
pub fn verify(payload: &SignaturePayload) -> bool {
    let Ok(public_key) = BlsPublicKey::from_bytes(&payload.public_key) else {
        return false;
    };
    let Ok(signature) = BlsSignature::from_bytes(&payload.signature) else {
        return false;
    };
    public_key.verify(&payload.message, &signature)
}

/// Check a hex-encoded triple
///
/// Malformed hex is an error; a well-formed triple that does not verify is
/// `Ok(false)`.
pub fn verify_hex(public_key: &str, message: &str, signature: &str) -> Result<bool, SigningError> {
    let payload = SignaturePayload::from_hex(public_key, message, signature)?;
    Ok(verify(&payload))
}

/// Sign a random message, then re-verify unless `skip_verification` is set
pub fn sign_and_check(
    key: &BlsSecretKey,
    skip_verification: bool,
) -> Result<SignaturePayload, SigningError> {
    let payload = sign(key);
    tracing::debug!(
        message = %payload.message_hex(),
        "signed registration message"
    );

    if skip_verification {
        tracing::warn!("signature self-check skipped");
    } else if !verify(&payload) {
        return Err(SigningError::SignatureMismatch);
    }

    Ok(payload)
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)
    }
}
