//! Beneficiary wallet signing
//!
//! The outer registration transaction is signed by the beneficiary wallet,
//! never by the validator key.

use alloy_consensus::{SignableTransaction, TxEnvelope};
use alloy_eips::eip2718::{Decodable2718, Encodable2718};
use alloy_primitives::{Address, Bytes, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use mevreg_crypto::{ExposeSecret, IntoSecret, SecretArray, SecretString};

use crate::error::{TxError, TxResult};
use crate::intent::TransactionIntent;

/// The beneficiary wallet's secp256k1 key
pub struct BeneficiaryKey {
    signer: PrivateKeySigner,
}

impl BeneficiaryKey {
    /// Parse a hex private key, with or without `0x`
    pub fn from_hex(key: &SecretString) -> TxResult<Self> {
        let hex_key = key.expose_secret().trim();
        let bytes = hex::decode(hex_key.trim_start_matches("0x"))
            .map_err(|_| TxError::InvalidBeneficiaryKey)?
            .into_secret();
        let scalar = SecretArray::<32>::from_slice(bytes.expose_secret())
            .ok_or(TxError::InvalidBeneficiaryKey)?;
        let signer = PrivateKeySigner::from_slice(scalar.expose_secret())
            .map_err(|_| TxError::InvalidBeneficiaryKey)?;
        Ok(Self { signer })
    }

    /// Address controlled by this key
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Require that this key controls `expected`
    pub fn ensure_address(&self, expected: Address) -> TxResult<()> {
        let actual = self.address();
        if actual != expected {
            return Err(TxError::BeneficiaryMismatch { expected, actual });
        }
        Ok(())
    }
}

impl std::fmt::Debug for BeneficiaryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeneficiaryKey")
            .field("address", &self.address())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// An EIP-2718 encoded, signed type-2 transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    raw: Bytes,
    hash: B256,
}

impl SignedTransaction {
    /// Parse raw signed transaction hex, with or without `0x`
    pub fn from_raw_hex(raw: &str) -> TxResult<Self> {
        let bytes = hex::decode(raw.trim().trim_start_matches("0x")).map_err(|e| {
            TxError::InvalidArgument {
                field: "raw transaction",
                reason: e.to_string(),
            }
        })?;
        let envelope =
            TxEnvelope::decode_2718(&mut bytes.as_slice()).map_err(|e| TxError::InvalidArgument {
                field: "raw transaction",
                reason: e.to_string(),
            })?;
        Ok(Self {
            raw: bytes.into(),
            hash: *envelope.tx_hash(),
        })
    }

    /// Encoded bytes
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// `0x`-prefixed hex of the encoded bytes
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }

    /// Transaction hash
    pub fn hash(&self) -> B256 {
        self.hash
    }
}

/// Sign `intent` with the beneficiary key
pub fn sign_transaction(
    intent: &TransactionIntent,
    key: &BeneficiaryKey,
) -> TxResult<SignedTransaction> {
    let tx = intent.to_eip1559();
    let signature = key
        .signer
        .sign_hash_sync(&tx.signature_hash())
        .map_err(|e| TxError::Signing(e.to_string()))?;

    let envelope = TxEnvelope::from(tx.into_signed(signature));
    let signed = SignedTransaction {
        raw: envelope.encoded_2718().into(),
        hash: *envelope.tx_hash(),
    };
    tracing::info!(hash = %signed.hash, from = %key.address(), "signed registration transaction");
    Ok(signed)
}
