//! Secure memory handling for cryptographic material
//!
//! Passwords, derived keys and decrypted scalars are held in containers that:
//! - zero their memory on drop (including error paths and unwinding)
//! - print `[REDACTED]` from `Debug`
//! - do not implement `Clone`

mod secret;

pub use secrecy::ExposeSecret;
pub use secret::{IntoSecret, SecretArray, SecretBytes, SecretString};
