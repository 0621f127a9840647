//! Property-based tests for registration signatures

use mevreg_crypto::keystore::{normalize_password, KdfModule};
use mevreg_crypto::{
    sign_message, verify, BlsSecretKey, ExposeSecret, IntoSecret, KeystoreBuilder,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any signature over any message verifies under its own key
    #[test]
    fn prop_sign_verify(seed in any::<[u8; 32]>(), message in proptest::collection::vec(any::<u8>(), 0..64)) {
        let key = BlsSecretKey::from_seed(&seed);
        let payload = sign_message(&key, &message);
        prop_assert!(verify(&payload));
    }

    /// Flipping any bit of the message breaks verification
    #[test]
    fn prop_tampered_message_rejected(seed in any::<[u8; 32]>(), index in 0usize..16, bit in 0u8..8) {
        let key = BlsSecretKey::from_seed(&seed);
        let mut payload = sign_message(&key, &[0x5Cu8; 16]);
        payload.message[index] ^= 1 << bit;
        prop_assert!(!verify(&payload));
    }

    /// Flipping any bit of the signature breaks verification
    #[test]
    fn prop_tampered_signature_rejected(seed in any::<[u8; 32]>(), index in 0usize..96, bit in 0u8..8) {
        let key = BlsSecretKey::from_seed(&seed);
        let mut payload = sign_message(&key, b"registration msg");
        payload.signature[index] ^= 1 << bit;
        prop_assert!(!verify(&payload));
    }

    /// Flipping any bit of the public key breaks verification, whether or not
    /// the result still decodes to a curve point
    #[test]
    fn prop_tampered_public_key_rejected(seed in any::<[u8; 32]>(), index in 0usize..48, bit in 0u8..8) {
        let key = BlsSecretKey::from_seed(&seed);
        let mut payload = sign_message(&key, b"registration msg");
        payload.public_key[index] ^= 1 << bit;
        prop_assert!(!verify(&payload));
    }

    /// Normalised passwords never contain control code points
    #[test]
    fn prop_normalised_password_has_no_controls(password in "\\PC*[\\x00-\\x1f\\x7f]?\\PC*") {
        let normalised = normalize_password(&password);
        let text = String::from_utf8(normalised.expose_secret().clone()).unwrap();
        prop_assert!(!text.chars().any(|c| matches!(c as u32, 0x00..=0x1F | 0x7F..=0x9F)));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// A keystore decrypts to the key it was built from
    #[test]
    fn prop_keystore_recovers_key(seed in any::<[u8; 32]>(), password in "[a-zA-Z0-9 ]{1,24}") {
        let key = BlsSecretKey::from_seed(&seed);
        let keystore = KeystoreBuilder::new(&key, &password)
            .kdf(KdfModule::new_pbkdf2(&seed, 4))
            .build()
            .unwrap();
        let decrypted = keystore.decrypt(&password.into_secret()).unwrap();
        prop_assert_eq!(decrypted.public_key(), key.public_key());
    }
}
