//! Secret wrapper utilities for consistent secret handling
//!
//! Provides type aliases and utilities around the `secrecy` crate for
//! handling sensitive strings and byte buffers.

use secrecy::{SecretBox, SecretString as SecrecySecretString};
use zeroize::Zeroize;

/// A secret byte buffer that is zeroized on drop.
///
/// Holds KDF output and decrypted keystore plaintext.
///
/// # Example
///
/// ```rust
/// use mevreg_crypto::secure::SecretBytes;
/// use secrecy::ExposeSecret;
///
/// let secret = SecretBytes::new(Box::new(vec![1, 2, 3, 4]));
/// assert_eq!(secret.expose_secret(), &vec![1, 2, 3, 4]);
/// ```
pub type SecretBytes = SecretBox<Vec<u8>>;

/// A secret string that is zeroized on drop.
///
/// Used for keystore passwords and hex-encoded wallet keys.
///
/// # Example
///
/// ```rust
/// use mevreg_crypto::secure::SecretString;
/// use secrecy::ExposeSecret;
///
/// let password: SecretString = "correct horse".to_string().into();
/// assert_eq!(password.expose_secret(), "correct horse");
/// ```
pub type SecretString = SecrecySecretString;

/// A fixed-size secret byte array.
///
/// Unlike `SecretBytes`, this lives inline; used for 32-byte scalars.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SecretArray<const N: usize> {
    inner: [u8; N],
}

impl<const N: usize> SecretArray<N> {
    /// Create a new secret array from bytes.
    pub fn new(bytes: [u8; N]) -> Self {
        Self { inner: bytes }
    }

    /// Copy a slice of exactly `N` bytes into a new secret array.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != N {
            return None;
        }
        let mut inner = [0u8; N];
        inner.copy_from_slice(bytes);
        Some(Self { inner })
    }

    /// Expose the secret bytes.
    ///
    /// The returned reference should not be stored.
    pub fn expose_secret(&self) -> &[u8; N] {
        &self.inner
    }
}

impl<const N: usize> std::fmt::Debug for SecretArray<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretArray")
            .field("length", &N)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Extension trait for creating secret values.
pub trait IntoSecret {
    /// The secret type this converts into.
    type Secret;

    /// Convert into a secret value.
    fn into_secret(self) -> Self::Secret;
}

impl IntoSecret for String {
    type Secret = SecretString;

    fn into_secret(self) -> Self::Secret {
        self.into()
    }
}

impl IntoSecret for Vec<u8> {
    type Secret = SecretBytes;

    fn into_secret(self) -> Self::Secret {
        SecretBox::new(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string() {
        let secret: SecretString = "my-passphrase".to_string().into();
        assert_eq!(secret.expose_secret(), "my-passphrase");
    }

    #[test]
    fn test_secret_array_from_slice() {
        let secret = SecretArray::<4>::from_slice(&[1, 2, 3, 4]).unwrap();
        assert_eq!(secret.expose_secret(), &[1, 2, 3, 4]);
        assert!(SecretArray::<4>::from_slice(&[1, 2, 3]).is_none());
    }

    #[test]
    fn test_secret_array_debug() {
        let secret = SecretArray::new([0xABu8; 32]);
        let debug = format!("{:?}", secret);

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("171")); // 0xAB = 171
    }

    #[test]
    fn test_secret_string_debug_is_redacted() {
        let secret = "hunter2".to_string().into_secret();
        assert!(!format!("{:?}", secret).contains("hunter2"));
    }

    #[test]
    fn test_into_secret_bytes() {
        let secret = vec![1, 2, 3].into_secret();
        assert_eq!(secret.expose_secret(), &vec![1, 2, 3]);
    }
}
