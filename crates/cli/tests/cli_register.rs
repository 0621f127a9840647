//! CLI integration tests for `mevreg register` and `mevreg build-transaction`.
//!
//! These tests verify that:
//! - Offline registration prints a signed type-2 transaction
//! - Offline preconditions (nonce, chain, fees) fail with clear messages
//! - The OFAC argument accepts only boolean spellings
//! - Wrong passwords and mismatched beneficiary keys are rejected

#![allow(deprecated)] // Command::cargo_bin is deprecated but still works

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use mevreg_crypto::keystore::KdfModule;
use mevreg_crypto::{BlsSecretKey, KeystoreBuilder};
use predicates::prelude::*;
use tempfile::TempDir;

const PASSWORD: &str = "registration-password";
/// Well-known development key, never use with real funds
const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
const PROXY_ABI: &str = include_str!("../../tx/abi/proxy_abi.json");

struct Fixture {
    dir: TempDir,
    keystore: PathBuf,
    password_file: PathBuf,
    key_file: PathBuf,
    abi_file: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let sk = BlsSecretKey::from_seed(&[21; 32]);
        let keystore = KeystoreBuilder::new(&sk, PASSWORD)
            .kdf(KdfModule::new_pbkdf2(&[0x33; 32], 2))
            .build()
            .unwrap();

        let keystore_path = dir.path().join("keystore.json");
        std::fs::write(&keystore_path, serde_json::to_string(&keystore).unwrap()).unwrap();
        let password_file = dir.path().join("password.txt");
        std::fs::write(&password_file, format!("{}\n", PASSWORD)).unwrap();
        let key_file = dir.path().join("beneficiary.key");
        std::fs::write(&key_file, DEV_KEY).unwrap();
        let abi_file = dir.path().join("proxy_abi.json");
        std::fs::write(&abi_file, PROXY_ABI).unwrap();

        Self {
            dir,
            keystore: keystore_path,
            password_file,
            key_file,
            abi_file,
        }
    }

    fn home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    /// `mevreg register <keystore> <ofac> <beneficiary>` with fixture secrets
    fn register(&self, ofac: &str, beneficiary: &str) -> Command {
        let mut cmd = mevreg(&self.home());
        cmd.arg("register")
            .arg(&self.keystore)
            .arg(ofac)
            .arg(beneficiary)
            .arg("--password-file")
            .arg(&self.password_file)
            .arg("--beneficiary-key-file")
            .arg(&self.key_file)
            .arg("--abi-file")
            .arg(&self.abi_file)
            .arg("--offline");
        cmd
    }
}

fn mevreg(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mevreg").unwrap();
    cmd.arg("--home")
        .arg(home)
        .env_remove("MEVREG_KEYSTORE_PASSWORD")
        .env_remove("MEVREG_BENEFICIARY_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_register_offline_prints_signed_transaction() {
    let fixture = Fixture::new();

    fixture
        .register("true", DEV_ADDRESS)
        .args(["--chain", "goerli", "--nonce", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Raw signed transaction: 0x02"))
        .stdout(predicate::str::contains("\"chainId\": 5"))
        .stdout(predicate::str::contains("\"nonce\": 5"))
        .stdout(predicate::str::contains("was not broadcast"));
}

#[test]
fn test_register_offline_json_output() {
    let fixture = Fixture::new();

    let output = fixture
        .register("no", DEV_ADDRESS)
        .args(["--chain", "Mainnet", "--nonce", "0", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["transaction"]["chainId"], 1);
    assert_eq!(json["transaction"]["gasLimit"], 150_000);
    assert!(json["rawTransaction"].as_str().unwrap().starts_with("0x02"));
    assert!(json["receipt"].is_null());
    assert_eq!(json["validator"]["message"].as_str().unwrap().len(), 32);
}

#[test]
fn test_register_offline_requires_nonce() {
    let fixture = Fixture::new();

    fixture
        .register("true", DEV_ADDRESS)
        .args(["--chain", "goerli"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("requires the nonce"));
}

#[test]
fn test_register_rejects_unknown_chain() {
    let fixture = Fixture::new();

    fixture
        .register("true", DEV_ADDRESS)
        .args(["--chain", "ropsten", "--nonce", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown chain"));
}

#[test]
fn test_register_rejects_priority_fee_above_max_fee() {
    let fixture = Fixture::new();

    fixture
        .register("true", DEV_ADDRESS)
        .args(["--nonce", "1", "--max-fee-per-gas", "1", "--max-priority-fee-per-gas", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds max fee per gas"));
}

#[test]
fn test_register_rejects_bad_ofac_value() {
    let fixture = Fixture::new();

    fixture
        .register("maybe", DEV_ADDRESS)
        .args(["--nonce", "1"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid truth value"));
}

#[test]
fn test_register_wrong_password_fails() {
    let fixture = Fixture::new();
    std::fs::write(&fixture.password_file, "not the password\n").unwrap();

    fixture
        .register("true", DEV_ADDRESS)
        .args(["--nonce", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid password"));
}

#[test]
fn test_register_beneficiary_mismatch() {
    let fixture = Fixture::new();

    fixture
        .register("true", "0x0000000000000000000000000000000000000001")
        .args(["--nonce", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("beneficiary key controls"));
}

#[test]
fn test_build_transaction_from_signed_triple() {
    let fixture = Fixture::new();
    let sk = BlsSecretKey::from_seed(&[22; 32]);
    let payload = mevreg_crypto::sign(&sk);

    let output = mevreg(&fixture.home())
        .arg("build-transaction")
        .arg(payload.public_key_hex())
        .arg(payload.message_hex())
        .arg(payload.signature_hex())
        .arg("off")
        .arg(DEV_ADDRESS)
        .arg("--beneficiary-key")
        .arg(DEV_KEY)
        .arg("--abi-file")
        .arg(&fixture.abi_file)
        .args(["--offline", "--nonce", "3", "--gas", "200000", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["transaction"]["chainId"], 5);
    assert_eq!(json["transaction"]["nonce"], 3);
    assert_eq!(json["transaction"]["gasLimit"], 200_000);
    assert_eq!(
        json["validator"]["publicKey"].as_str().unwrap(),
        payload.public_key_hex()
    );
}

#[test]
fn test_build_transaction_rejects_invalid_signature() {
    let fixture = Fixture::new();
    let sk = BlsSecretKey::from_seed(&[23; 32]);
    let mut payload = mevreg_crypto::sign(&sk);
    payload.message[0] ^= 0x01;

    mevreg(&fixture.home())
        .arg("build-transaction")
        .arg(payload.public_key_hex())
        .arg(payload.message_hex())
        .arg(payload.signature_hex())
        .arg("true")
        .arg(DEV_ADDRESS)
        .arg("--beneficiary-key")
        .arg(DEV_KEY)
        .arg("--abi-file")
        .arg(&fixture.abi_file)
        .args(["--offline", "--nonce", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("signature is not valid"));
}

#[test]
fn test_build_transaction_rejects_short_triple_without_verification() {
    let fixture = Fixture::new();

    mevreg(&fixture.home())
        .args(["--log-level", "info", "build-transaction", "00", "00", "00", "true"])
        .arg(DEV_ADDRESS)
        .arg("--beneficiary-key")
        .arg(DEV_KEY)
        .arg("--abi-file")
        .arg(&fixture.abi_file)
        .args(["--offline", "--nonce", "3", "--no-verify"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("public key must be 48 bytes, got 1"));
}
