//! Register command implementation
//!
//! The full pipeline: decrypt, sign, verify, build, sign the transaction and
//! broadcast it when online.

use std::path::Path;

use alloy_primitives::Address;
use anyhow::{Context, Result};
use mevreg_crypto::EncryptedKeystore;

use super::{print_outcome, run_options, OutputFormat, PasswordArgs, TxArgs};
use crate::client_config::ClientConfig;
use crate::pipeline::{Registration, SignatureSource};

/// Execute the register command
#[allow(clippy::too_many_arguments)]
pub async fn execute(
    config: &ClientConfig,
    keystore_path: &Path,
    ofac: bool,
    beneficiary: Address,
    password: &PasswordArgs,
    tx: &TxArgs,
    no_verify: bool,
    output: OutputFormat,
) -> Result<()> {
    let options = run_options(config, tx.fee_unit, no_verify);
    let settings = tx.settings(config, &options, beneficiary, ofac)?;

    let keystore = EncryptedKeystore::load(keystore_path)
        .with_context(|| format!("Failed to load keystore {}", keystore_path.display()))?;

    let password = password.source()?;
    let beneficiary_key = tx.beneficiary_source()?;
    let registration = Registration {
        settings,
        options,
        beneficiary_key: beneficiary_key.as_ref(),
        broadcast: true,
    };

    let outcome = registration
        .run(SignatureSource::Keystore {
            keystore: &keystore,
            password: password.as_ref(),
        })
        .await?;
    print_outcome(&outcome, output)
}
