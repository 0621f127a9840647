//! Sign command implementation
//!
//! Decrypts a keystore and signs a fresh random registration message.

use std::path::Path;

use anyhow::{Context, Result};
use mevreg_crypto::{sign_and_check, EncryptedKeystore};

use super::{payload_json, print_payload, OutputFormat, PasswordArgs};
use crate::pipeline::{decrypt_keystore, RunOptions};

/// Execute the sign command
pub fn execute(
    keystore_path: &Path,
    password: &PasswordArgs,
    options: RunOptions,
    output: OutputFormat,
) -> Result<()> {
    let keystore = EncryptedKeystore::load(keystore_path)
        .with_context(|| format!("Failed to load keystore {}", keystore_path.display()))?;

    let key = decrypt_keystore(&keystore, password.source()?.as_ref())?;
    let payload = sign_and_check(&key, options.skip_verification)?;

    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&payload_json(&payload))?)
        }
        OutputFormat::Text => print_payload(&payload),
    }

    Ok(())
}
