//! Transaction error types

use alloy_primitives::{Address, B256};
use thiserror::Error;

/// Errors raised while building, signing or broadcasting a registration
#[derive(Debug, Error)]
pub enum TxError {
    /// Offline mode without a nonce
    #[error(
        "offline mode requires the nonce of the beneficiary wallet address (pass --nonce <nonce>)"
    )]
    MissingNonce,

    /// Chain name not in the chain table
    #[error("unknown chain {0:?} (expected one of: mainnet, goerli)")]
    UnknownChain(String),

    /// A fee field is absent and defaults are disabled
    #[error("missing fee parameter: {0}")]
    MissingFeeParameter(&'static str),

    /// A fee amount could not be parsed or is inconsistent
    #[error("invalid fee: {0}")]
    InvalidFee(String),

    /// The contract ABI lacks the registration function or disagrees with it
    #[error("contract ABI mismatch: {0}")]
    AbiMismatch(String),

    /// The contract ABI could not be read or parsed
    #[error("failed to load contract ABI from {origin}: {reason}")]
    AbiLoad { origin: String, reason: String },

    /// The contract ABI could not be downloaded
    #[error("failed to fetch contract ABI from {url}: {source}")]
    AbiFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Call arguments could not be encoded
    #[error("failed to encode add_validator call: {0}")]
    Encoding(String),

    /// Malformed operator input
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    /// The beneficiary key is not a valid secp256k1 scalar
    #[error("invalid beneficiary private key")]
    InvalidBeneficiaryKey,

    /// The beneficiary key does not control the given beneficiary address
    #[error("beneficiary key controls {actual}, not the beneficiary address {expected}")]
    BeneficiaryMismatch { expected: Address, actual: Address },

    /// Transaction signing failed
    #[error("failed to sign transaction: {0}")]
    Signing(String),

    /// A JSON-RPC call failed
    #[error("transport failure calling {method}: {source}")]
    Transport {
        method: &'static str,
        #[source]
        source: jsonrpsee::core::ClientError,
    },

    /// The node acknowledged a transaction other than the one that was signed
    #[error("node reported transaction hash {node}, but the signed transaction hashes to {local}")]
    HashMismatch { local: B256, node: B256 },
}

/// Result type for transaction operations
pub type TxResult<T> = Result<T, TxError>;
