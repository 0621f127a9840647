//! Verify command implementation

use anyhow::Result;
use mevreg_crypto::{verify_hex, SigningError};

/// Execute the verify command
///
/// A triple that does not verify is an error, so the process exits non-zero.
pub fn execute(public_key: &str, message: &str, signature: &str) -> Result<()> {
    if !verify_hex(public_key, message, signature)? {
        return Err(SigningError::InvalidSignature.into());
    }

    println!("Signature is valid");
    Ok(())
}
