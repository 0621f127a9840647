//! CLI integration tests for `mevreg sign`, `verify`, `extract-key` and `config`.

#![allow(deprecated)] // Command::cargo_bin is deprecated but still works

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use mevreg_crypto::keystore::KdfModule;
use mevreg_crypto::{BlsSecretKey, KeystoreBuilder};
use predicates::prelude::*;
use tempfile::TempDir;

const PASSWORD: &str = "sign-password";

fn mevreg(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mevreg").unwrap();
    cmd.arg("--home")
        .arg(home)
        .env_remove("MEVREG_KEYSTORE_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Write a fast-KDF keystore for `sk` and return its path
fn write_keystore(dir: &TempDir, sk: &BlsSecretKey) -> PathBuf {
    let keystore = KeystoreBuilder::new(sk, PASSWORD)
        .kdf(KdfModule::new_pbkdf2(&[0x44; 32], 2))
        .build()
        .unwrap();
    let path = dir.path().join("keystore.json");
    std::fs::write(&path, serde_json::to_string_pretty(&keystore).unwrap()).unwrap();
    path
}

#[test]
fn test_sign_json_output_verifies() {
    let dir = TempDir::new().unwrap();
    let sk = BlsSecretKey::from_seed(&[31; 32]);
    let keystore = write_keystore(&dir, &sk);

    let output = mevreg(dir.path())
        .arg("sign")
        .arg(&keystore)
        .args(["--password", PASSWORD, "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let public_key = json["publicKey"].as_str().unwrap();
    let message = json["message"].as_str().unwrap();
    let signature = json["signature"].as_str().unwrap();
    assert_eq!(public_key, hex::encode(sk.public_key().to_bytes()));
    assert_eq!(message.len(), 32);
    assert_eq!(signature.len(), 192);

    // The printed triple passes the verify command
    mevreg(dir.path())
        .args(["verify", public_key, message, signature])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signature is valid"));
}

#[test]
fn test_sign_text_output() {
    let dir = TempDir::new().unwrap();
    let sk = BlsSecretKey::from_seed(&[32; 32]);
    let keystore = write_keystore(&dir, &sk);

    mevreg(dir.path())
        .arg("sign")
        .arg(&keystore)
        .args(["--password", PASSWORD])
        .assert()
        .success()
        .stdout(predicate::str::contains("Validator public key:"))
        .stdout(predicate::str::contains("Signature:"));
}

#[test]
fn test_sign_wrong_password() {
    let dir = TempDir::new().unwrap();
    let keystore = write_keystore(&dir, &BlsSecretKey::from_seed(&[33; 32]));

    mevreg(dir.path())
        .arg("sign")
        .arg(&keystore)
        .args(["--password", "wrong"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid password"));
}

#[test]
fn test_sign_corrupt_keystore() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("keystore.json");
    std::fs::write(&path, r#"{"version": 3}"#).unwrap();

    mevreg(dir.path())
        .arg("sign")
        .arg(&path)
        .args(["--password", PASSWORD])
        .assert()
        .failure()
        .stderr(predicate::str::contains("corrupt keystore"));
}

#[test]
fn test_verify_rejects_tampered_triple() {
    let dir = TempDir::new().unwrap();
    let payload = mevreg_crypto::sign(&BlsSecretKey::from_seed(&[34; 32]));
    let mut message = payload.message.clone();
    message[15] ^= 0x80;

    mevreg(dir.path())
        .arg("verify")
        .arg(payload.public_key_hex())
        .arg(hex::encode(message))
        .arg(payload.signature_hex())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("signature is not valid"));
}

#[test]
fn test_verify_rejects_malformed_hex() {
    let dir = TempDir::new().unwrap();

    mevreg(dir.path())
        .args(["verify", "zz", "00", "00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid hex in public key"));
}

#[test]
fn test_extract_key_prints_banner_and_key() {
    let dir = TempDir::new().unwrap();
    let sk = BlsSecretKey::from_seed(&[35; 32]);
    let keystore = write_keystore(&dir, &sk);
    let password_file = dir.path().join("password.txt");
    std::fs::write(&password_file, PASSWORD).unwrap();

    mevreg(dir.path())
        .arg("extract-key")
        .arg(&keystore)
        .arg("--password-file")
        .arg(&password_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("DANGER"))
        .stdout(predicate::str::contains(hex::encode(sk.to_bytes().as_slice())))
        .stdout(predicate::str::contains(hex::encode(
            sk.public_key().to_bytes(),
        )));
}

#[test]
fn test_config_init_and_show() {
    let dir = TempDir::new().unwrap();
    let home = dir.path().join("home");

    mevreg(&home)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("client.toml"));
    assert!(home.join("config/client.toml").exists());

    mevreg(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--overwrite"));

    mevreg(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chain = \"goerli\""))
        .stdout(predicate::str::contains(
            "contract-address = \"0x606A1cB03cED72Cb1C7D0cdCcb630eDba2eF6231\"",
        ));
}
