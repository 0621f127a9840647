//! Build-transaction command implementation
//!
//! Turns an existing (public key, message, signature) triple into a signed
//! `add_validator` transaction.

use alloy_primitives::Address;
use anyhow::Result;
use mevreg_crypto::SignaturePayload;
use tracing::warn;

use super::{print_outcome, run_options, OutputFormat, TxArgs};
use crate::client_config::ClientConfig;
use crate::pipeline::{Registration, SignatureSource};

/// Positional inputs of `build-transaction`
pub struct BuildRequest {
    pub public_key: String,
    pub message: String,
    pub signature: String,
    pub ofac: bool,
    pub beneficiary: Address,
    pub no_verify: bool,
    pub broadcast: bool,
}

/// Execute the build-transaction command
pub async fn execute(
    config: &ClientConfig,
    request: BuildRequest,
    tx: &TxArgs,
    output: OutputFormat,
) -> Result<()> {
    let payload =
        SignaturePayload::from_hex(&request.public_key, &request.message, &request.signature)?;

    let options = run_options(config, tx.fee_unit, request.no_verify);
    let settings = tx.settings(config, &options, request.beneficiary, request.ofac)?;
    if request.broadcast && settings.endpoint.is_none() {
        warn!("--broadcast has no effect offline");
    }

    let beneficiary_key = tx.beneficiary_source()?;
    let registration = Registration {
        settings,
        options,
        beneficiary_key: beneficiary_key.as_ref(),
        broadcast: request.broadcast,
    };

    let outcome = registration
        .run(SignatureSource::Provided(payload))
        .await?;
    print_outcome(&outcome, output)
}
