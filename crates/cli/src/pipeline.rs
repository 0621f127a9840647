//! Registration pipeline
//!
//! Runs the steps shared by `register` and `build-transaction`:
//!
//! 1. Validate mode preconditions (nonce, chain, fees) before any
//!    cryptographic work
//! 2. Load the contract ABI
//! 3. Obtain the validator signature, either by decrypting a keystore and
//!    signing a fresh message or from a caller-supplied triple
//! 4. Build the `add_validator` transaction (offline or through the node)
//! 5. Sign it with the beneficiary wallet
//! 6. Broadcast and wait for the receipt, when online and requested

use std::path::PathBuf;
use std::time::Duration;

use alloy_primitives::Address;
use anyhow::Result;
use mevreg_crypto::{
    sign_and_check, verify, BlsSecretKey, EncryptedKeystore, SignaturePayload, SigningError,
};
use mevreg_tx::fees::{self, FeeMode};
use mevreg_tx::{
    broadcast, sign_transaction, BeneficiaryKey, BuildMode, ContractAbi, EthRpc, FeeOverrides,
    FeeUnit, HttpEthRpc, OfflinePlan, Receipt, RegistrationCall, SignedTransaction,
    TransactionBuilder, TransactionIntent, TxResult,
};
use tracing::{info, warn};

use crate::secrets::{SecretSource, BENEFICIARY_KEY_PROMPT, KEYSTORE_PASSWORD_PROMPT};

/// Attempts allowed for an interactively entered keystore password
pub const MAX_PASSWORD_ATTEMPTS: usize = 3;

/// Behaviour switches shared by every command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Skip the BLS self-check after signing (and the check of supplied triples)
    pub skip_verification: bool,
    /// Unit of fee amounts given by the operator
    pub fee_unit: FeeUnit,
}

/// Where the contract ABI comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiSource {
    File(PathBuf),
    Url(String),
}

impl AbiSource {
    pub async fn load(&self) -> TxResult<ContractAbi> {
        match self {
            AbiSource::File(path) => ContractAbi::load(path),
            AbiSource::Url(url) => ContractAbi::fetch(url).await,
        }
    }
}

/// Transaction settings after merging flags with `client.toml`
#[derive(Debug, Clone)]
pub struct TxSettings {
    /// JSON-RPC endpoint; `None` runs offline
    pub endpoint: Option<String>,
    pub chain: String,
    pub nonce: Option<u64>,
    pub fees: FeeOverrides,
    pub contract: Address,
    pub beneficiary: Address,
    pub ofac: bool,
    pub abi: AbiSource,
    pub poll_interval: Duration,
}

/// Where the validator signature comes from
pub enum SignatureSource<'a> {
    /// Decrypt a keystore and sign a fresh random message
    Keystore {
        keystore: &'a EncryptedKeystore,
        password: &'a dyn SecretSource,
    },
    /// A (public key, message, signature) triple produced earlier
    Provided(SignaturePayload),
}

/// Everything the pipeline produced
#[derive(Debug)]
pub struct RegistrationOutcome {
    pub payload: SignaturePayload,
    pub intent: TransactionIntent,
    pub signed: SignedTransaction,
    /// Present only when the transaction was broadcast
    pub receipt: Option<Receipt>,
}

/// A configured registration run
pub struct Registration<'a> {
    pub settings: TxSettings,
    pub options: RunOptions,
    pub beneficiary_key: &'a dyn SecretSource,
    /// Submit the signed transaction when online
    pub broadcast: bool,
}

impl Registration<'_> {
    /// Run against the configured endpoint, or offline without one
    pub async fn run(&self, signature: SignatureSource<'_>) -> Result<RegistrationOutcome> {
        match self.settings.endpoint.as_deref() {
            Some(endpoint) => {
                let rpc = HttpEthRpc::new(endpoint)?;
                self.run_with_rpc(signature, Some(&rpc)).await
            }
            None => self.run_with_rpc(signature, None).await,
        }
    }

    /// Run with an explicit node; `None` selects offline construction
    pub async fn run_with_rpc(
        &self,
        signature: SignatureSource<'_>,
        rpc: Option<&dyn EthRpc>,
    ) -> Result<RegistrationOutcome> {
        let settings = &self.settings;
        let mode = self.prepare(rpc)?;

        let abi = settings.abi.load().await?;

        let payload = match signature {
            SignatureSource::Keystore { keystore, password } => {
                let key = decrypt_keystore(keystore, password)?;
                sign_and_check(&key, self.options.skip_verification)?
            }
            SignatureSource::Provided(payload) => {
                // Lengths are checked even when verification is skipped
                payload.check_lengths()?;
                if self.options.skip_verification {
                    warn!("signature verification skipped");
                } else if !verify(&payload) {
                    return Err(SigningError::InvalidSignature.into());
                }
                payload
            }
        };
        let validator = payload.public_key_hex();
        info!(
            validator = %validator.get(..16).unwrap_or(&validator),
            ofac = settings.ofac,
            "validator signature ready"
        );

        let call = RegistrationCall::from_payload(&payload, settings.ofac);
        let builder = TransactionBuilder::new(settings.contract, abi);
        let intent = builder.build(mode, settings.beneficiary, &call).await?;

        let key_hex = self.beneficiary_key.read(BENEFICIARY_KEY_PROMPT)?;
        let key = BeneficiaryKey::from_hex(&key_hex)?;
        drop(key_hex);
        key.ensure_address(settings.beneficiary)?;
        let signed = sign_transaction(&intent, &key)?;

        let receipt = match rpc {
            Some(rpc) if self.broadcast => {
                Some(broadcast(rpc, &signed, settings.poll_interval).await?)
            }
            _ => None,
        };

        Ok(RegistrationOutcome {
            payload,
            intent,
            signed,
            receipt,
        })
    }

    fn prepare<'r>(&self, rpc: Option<&'r dyn EthRpc>) -> Result<BuildMode<'r>> {
        let settings = &self.settings;
        match rpc {
            Some(rpc) => {
                if let Some(nonce) = settings.nonce {
                    warn!(nonce, "ignoring --nonce: the node supplies the nonce online");
                }
                let fees = fees::resolve(FeeMode::Online, &settings.fees)?;
                Ok(BuildMode::Online { rpc, fees })
            }
            None => {
                let plan = OfflinePlan::prepare(&settings.chain, settings.nonce, &settings.fees)?;
                Ok(BuildMode::Offline(plan))
            }
        }
    }
}

/// Decrypt `keystore`, asking again on a wrong interactive password
pub fn decrypt_keystore(
    keystore: &EncryptedKeystore,
    password: &dyn SecretSource,
) -> Result<BlsSecretKey> {
    let attempts = if password.is_interactive() {
        MAX_PASSWORD_ATTEMPTS
    } else {
        1
    };

    let mut attempt = 1;
    loop {
        let secret = password.read(KEYSTORE_PASSWORD_PROMPT)?;
        match keystore.decrypt(&secret) {
            Ok(key) => {
                info!(pubkey = %&keystore.pubkey()[..16], "keystore decrypted");
                return Ok(key);
            }
            Err(e) if e.is_invalid_password() && attempt < attempts => {
                warn!(attempt, "keystore password rejected");
                eprintln!("Invalid password, please try again.");
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
