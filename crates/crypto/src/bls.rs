//! BLS12-381 signatures for validator registration
//!
//! This module wraps `blst` with:
//! - the min_pk variant (48-byte public keys in G1, 96-byte signatures in G2)
//! - the proof-of-possession ciphersuite used by Ethereum consensus keys
//! - secret keys that cannot be cloned and are wiped on drop

use crate::error::BlsError;
use blst::min_pk::{PublicKey as BlstPubKey, SecretKey as BlstSecKey, Signature as BlstSig};
use blst::BLST_ERROR;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Domain separation tag of the proof-of-possession ciphersuite
pub const DST_POP: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Length of a serialized secret scalar
pub const SECRET_KEY_LENGTH: usize = 32;

/// Length of a compressed public key
pub const PUBLIC_KEY_LENGTH: usize = 48;

/// Length of a compressed signature
pub const SIGNATURE_LENGTH: usize = 96;

/// BLS12-381 secret key (32-byte big-endian scalar)
///
/// Intentionally not `Clone`. The inner `blst` scalar is zeroized when dropped.
pub struct BlsSecretKey(BlstSecKey);

impl BlsSecretKey {
    /// Load from raw big-endian scalar bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlsError> {
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(BlsError::InvalidSecretKey);
        }
        BlstSecKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| BlsError::InvalidSecretKey)
    }

    /// Derive a key from input keying material (EIP-2333 `KeyGen`)
    ///
    /// Only used to produce fixtures; production keys always come from a keystore.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn from_seed(ikm: &[u8; 32]) -> Self {
        Self(BlstSecKey::key_gen(ikm, &[]).expect("32-byte ikm is always accepted"))
    }

    /// Serialize to big-endian scalar bytes
    ///
    /// The returned buffer is wiped when dropped.
    pub fn to_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_LENGTH]> {
        Zeroizing::new(self.0.to_bytes())
    }

    /// Get the corresponding public key
    pub fn public_key(&self) -> BlsPublicKey {
        BlsPublicKey(self.0.sk_to_pk())
    }

    /// Sign a message under the proof-of-possession ciphersuite
    pub fn sign(&self, msg: &[u8]) -> BlsSignature {
        BlsSignature(self.0.sign(msg, DST_POP, &[]))
    }
}

impl std::fmt::Debug for BlsSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlsSecretKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// BLS12-381 public key (48 bytes compressed)
#[derive(Clone, PartialEq, Eq)]
pub struct BlsPublicKey(BlstPubKey);

impl BlsPublicKey {
    /// Load from compressed bytes, validating that the point is in the group
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlsError> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(BlsError::InvalidPublicKey);
        }
        let pk = BlstPubKey::key_validate(bytes).map_err(|_| BlsError::InvalidPublicKey)?;
        Ok(Self(pk))
    }

    /// Serialize to compressed bytes
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0.to_bytes()
    }

    /// Verify a signature over `msg`
    pub fn verify(&self, msg: &[u8], sig: &BlsSignature) -> bool {
        sig.0.verify(true, msg, DST_POP, &[], &self.0, true) == BLST_ERROR::BLST_SUCCESS
    }
}

impl std::fmt::Debug for BlsPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.to_bytes();
        write!(f, "BlsPublicKey({})", hex::encode(&bytes[..8]))
    }
}

impl std::fmt::Display for BlsPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl Serialize for BlsPublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(self.to_bytes()))
    }
}

impl<'de> Deserialize<'de> for BlsPublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// BLS12-381 signature (96 bytes compressed)
#[derive(Clone)]
pub struct BlsSignature(BlstSig);

impl BlsSignature {
    /// Load from compressed bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlsError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(BlsError::InvalidSignature);
        }
        BlstSig::from_bytes(bytes)
            .map(Self)
            .map_err(|_| BlsError::InvalidSignature)
    }

    /// Serialize to compressed bytes
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.0.to_bytes()
    }

    /// Verify signature against public key
    pub fn verify(&self, msg: &[u8], pubkey: &BlsPublicKey) -> bool {
        pubkey.verify(msg, self)
    }
}

impl std::fmt::Debug for BlsSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.to_bytes();
        write!(f, "BlsSignature({})", hex::encode(&bytes[..8]))
    }
}

impl PartialEq for BlsSignature {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BlsSignature {}
