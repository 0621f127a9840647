//! Validator registration transactions
//!
//! This crate turns a signed registration message into a signed EIP-1559
//! transaction calling `add_validator(bytes,bytes,bytes,bool)`:
//!
//! - [`fees`]: static defaults and operator overrides
//! - [`abi`] and [`call`]: contract ABI loading and call encoding
//! - [`builder`]: online (node-assisted) and offline construction
//! - [`signer`]: beneficiary wallet signing
//! - [`rpc`] and [`broadcast`]: JSON-RPC access and receipt waiting

pub mod abi;
pub mod broadcast;
pub mod builder;
pub mod call;
pub mod chain;
pub mod error;
pub mod fees;
pub mod intent;
pub mod rpc;
pub mod signer;

pub use abi::{ContractAbi, DEFAULT_ABI_URL};
pub use broadcast::{broadcast, wait_for_receipt, Receipt, DEFAULT_POLL_INTERVAL};
pub use builder::{BuildMode, OfflinePlan, TransactionBuilder, DEFAULT_CONTRACT_ADDRESS};
pub use call::RegistrationCall;
pub use chain::Chain;
pub use error::{TxError, TxResult};
pub use fees::{FeeMode, FeeOverrides, FeeParameters, FeeUnit};
pub use intent::TransactionIntent;
pub use rpc::{CallRequest, EthRpc, HttpEthRpc, RpcReceipt};
pub use signer::{sign_transaction, BeneficiaryKey, SignedTransaction};
