//! Password processing per EIP-2335
//!
//! The password is NFKD-normalised, then C0, C1 and DEL control code points
//! are removed before the UTF-8 bytes are handed to the KDF.

use secrecy::SecretBox;
use unicode_normalization::UnicodeNormalization;

use crate::secure::SecretBytes;

fn is_control(c: char) -> bool {
    matches!(c as u32, 0x00..=0x1F | 0x7F..=0x9F)
}

/// Normalise a password into the byte string fed to the KDF
pub fn normalize_password(password: &str) -> SecretBytes {
    let normalized: String = password.nfkd().filter(|c| !is_control(*c)).collect();
    SecretBox::new(Box::new(normalized.into_bytes()))
}
