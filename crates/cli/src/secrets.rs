//! Secret input
//!
//! Keystore passwords and beneficiary wallet keys are read through
//! [`SecretSource`]. The terminal implementation hides input; the fixed one
//! carries a value from a flag, a file or a test.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use mevreg_crypto::{ExposeSecret, IntoSecret, SecretString};

/// Prompt used for keystore passwords
pub const KEYSTORE_PASSWORD_PROMPT: &str = "Please enter the keystore decryption password: ";

/// Prompt used for the beneficiary wallet key
pub const BENEFICIARY_KEY_PROMPT: &str = "Please enter the beneficiary wallet private key: ";

/// Where a secret comes from
pub trait SecretSource {
    /// Produce the secret, showing `prompt` if input is interactive
    fn read(&self, prompt: &str) -> Result<SecretString>;

    /// Whether asking again can yield a different answer
    fn is_interactive(&self) -> bool {
        false
    }
}

/// Hidden terminal input
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptSource;

impl SecretSource for PromptSource {
    fn read(&self, prompt: &str) -> Result<SecretString> {
        let value = rpassword::prompt_password(prompt).context("Failed to read secret")?;
        Ok(value.into_secret())
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// A secret known up front
pub struct FixedSource(SecretString);

impl FixedSource {
    pub fn new(secret: SecretString) -> Self {
        Self(secret)
    }

    /// Read the secret from the first line of a file
    pub fn from_file(path: &Path) -> Result<Self> {
        read_secret_from_file(path).map(Self)
    }
}

impl SecretSource for FixedSource {
    fn read(&self, _prompt: &str) -> Result<SecretString> {
        Ok(self.0.expose_secret().to_string().into_secret())
    }
}

impl std::fmt::Debug for FixedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FixedSource").field(&"[REDACTED]").finish()
    }
}

/// Read a secret from a file
///
/// Only the trailing line break is removed; passwords may legitimately start
/// or end with spaces.
pub fn read_secret_from_file(path: &Path) -> Result<SecretString> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read secret file: {}", path.display()))?
        .into_secret();

    let secret = content.expose_secret().trim_end_matches(['\n', '\r']);
    if secret.is_empty() {
        return Err(anyhow!("Secret file is empty: {}", path.display()));
    }

    Ok(secret.to_string().into_secret())
}

/// Pick a source: an inline value, then a file, then the terminal
pub fn resolve_source(value: Option<String>, file: Option<&Path>) -> Result<Box<dyn SecretSource>> {
    match (value, file) {
        (Some(value), _) => Ok(Box::new(FixedSource::new(value.into_secret()))),
        (None, Some(path)) => Ok(Box::new(FixedSource::from_file(path)?)),
        (None, None) => Ok(Box::new(PromptSource)),
    }
}
