//! Extract-key command implementation
//!
//! Prints the validator secret key. This is the only command that ever
//! writes key material to the terminal.

use std::path::Path;

use anyhow::{Context, Result};
use mevreg_crypto::{EncryptedKeystore, ExposeSecret, IntoSecret};

use super::PasswordArgs;
use crate::pipeline::decrypt_keystore;

/// Execute the extract-key command
pub fn execute(keystore_path: &Path, password: &PasswordArgs) -> Result<()> {
    let keystore = EncryptedKeystore::load(keystore_path)
        .with_context(|| format!("Failed to load keystore {}", keystore_path.display()))?;

    let key = decrypt_keystore(&keystore, password.source()?.as_ref())?;
    let secret_hex = hex::encode(key.to_bytes().as_slice()).into_secret();

    println!();
    println!("DANGER! NEVER SHARE YOUR PRIVATE KEY!");
    println!("Anyone holding it can sign as your validator.");
    println!();
    println!("Private key: {}", secret_hex.expose_secret());
    println!("Public key:  {}", key.public_key());

    Ok(())
}
