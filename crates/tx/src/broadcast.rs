//! Broadcasting and receipt waiting
//!
//! Submits once, then polls for the receipt at a fixed interval until the
//! node reports inclusion. There is no timeout and no retry: any transport
//! error ends the wait. The locally computed hash is authoritative; a node
//! that acknowledges a different hash is treated as an error.

use std::time::Duration;

use alloy_primitives::B256;
use serde::Serialize;

use crate::error::{TxError, TxResult};
use crate::rpc::{EthRpc, RpcReceipt};
use crate::signer::SignedTransaction;

/// Default interval between receipt queries
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Inclusion receipt of a broadcast transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub success: bool,
    pub gas_used: u64,
}

impl Receipt {
    fn from_rpc(receipt: RpcReceipt, block_number: u64) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            block_number,
            // Pre-Byzantium receipts carry no status
            success: receipt.status.map_or(true, |s| s.to::<u64>() == 1),
            gas_used: receipt.gas_used.to(),
        }
    }
}

/// Submit `signed` and wait for its receipt
pub async fn broadcast(
    rpc: &dyn EthRpc,
    signed: &SignedTransaction,
    poll_interval: Duration,
) -> TxResult<Receipt> {
    let hash = signed.hash();
    let reported = rpc.send_raw_transaction(signed.raw()).await?;
    if reported != hash {
        return Err(TxError::HashMismatch {
            local: hash,
            node: reported,
        });
    }
    tracing::info!(%hash, "transaction submitted, waiting for receipt");
    wait_for_receipt(rpc, hash, poll_interval).await
}

/// Poll `eth_getTransactionReceipt` until the transaction is in a block
pub async fn wait_for_receipt(
    rpc: &dyn EthRpc,
    hash: B256,
    poll_interval: Duration,
) -> TxResult<Receipt> {
    loop {
        if let Some(receipt) = rpc.transaction_receipt(hash).await? {
            if let Some(block) = receipt.block_number {
                let receipt = Receipt::from_rpc(receipt, block.to());
                tracing::info!(
                    %hash,
                    block = receipt.block_number,
                    success = receipt.success,
                    "transaction included"
                );
                return Ok(receipt);
            }
        }
        tracing::debug!(%hash, "receipt not available yet");
        tokio::time::sleep(poll_interval).await;
    }
}
