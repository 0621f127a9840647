//! Broadcast command implementation

use std::time::Duration;

use anyhow::Result;
use mevreg_tx::{broadcast, HttpEthRpc, SignedTransaction};

use super::print_receipt;

/// Execute the broadcast command
pub async fn execute(endpoint: &str, raw_transaction: &str, poll_interval: Duration) -> Result<()> {
    let signed = SignedTransaction::from_raw_hex(raw_transaction)?;
    let rpc = HttpEthRpc::new(endpoint)?;

    println!("Transaction hash: {}", signed.hash());
    println!("Waiting for the transaction to be included...");

    let receipt = broadcast(&rpc, &signed, poll_interval).await?;
    print_receipt(&receipt);
    Ok(())
}
