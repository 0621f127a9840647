//! Subcommands of the `mevreg` binary
//!
//! - `sign`: decrypt a keystore and sign a fresh registration message
//! - `verify`: check a (public key, message, signature) triple
//! - `build-transaction`: turn a signed triple into a signed transaction
//! - `register`: keystore to signed (and broadcast) transaction in one go
//! - `broadcast`: submit a raw signed transaction and wait for its receipt
//! - `extract-key`: print the secret key held by a keystore
//! - `config`: inspect or initialise `client.toml`

pub mod broadcast;
pub mod build;
pub mod config;
pub mod extract;
pub mod register;
pub mod sign;
pub mod verify;

use std::path::{Path, PathBuf};

use alloy_primitives::Address;
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use mevreg_crypto::SignaturePayload;
use mevreg_tx::{FeeOverrides, FeeUnit, Receipt};
use serde_json::json;

use crate::client_config::ClientConfig;
use crate::pipeline::{AbiSource, RegistrationOutcome, RunOptions, TxSettings};
use crate::secrets::{resolve_source, SecretSource};

/// Registration subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Sign a random message with the validator key held in a keystore
    ///
    /// Decrypts an EIP-2335 keystore, signs 16 random bytes under the
    /// BLS12-381 proof-of-possession ciphersuite and prints the public key,
    /// message and signature as hex.
    Sign {
        /// Path to the EIP-2335 keystore file
        keystore: PathBuf,

        #[command(flatten)]
        password: PasswordArgs,

        /// Skip re-verifying the signature. You might waste gas.
        #[arg(long)]
        no_verify: bool,

        /// Output format (text|json)
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Verify a BLS signature over a registration message
    Verify {
        /// Validator public key (hex)
        public_key: String,

        /// Signed message (hex)
        message: String,

        /// BLS signature (hex)
        signature: String,
    },

    /// Build and sign an add_validator transaction from an existing signature
    BuildTransaction {
        /// Validator public key (hex)
        public_key: String,

        /// Signed message (hex)
        message: String,

        /// BLS signature (hex)
        signature: String,

        /// Whether the validator only relays OFAC-compliant blocks (true|false)
        #[arg(value_parser = parse_ofac, action = clap::ArgAction::Set)]
        ofac: bool,

        /// Beneficiary wallet address; pays gas and receives rewards
        beneficiary_address: Address,

        #[command(flatten)]
        tx: TxArgs,

        /// Skip verifying the given signature. You might waste gas.
        #[arg(long)]
        no_verify: bool,

        /// Broadcast the transaction when an endpoint is available
        #[arg(long)]
        broadcast: bool,

        /// Output format (text|json)
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Register a validator: sign, build, sign the transaction and broadcast
    ///
    /// Online (with an endpoint) the node supplies chain id, nonce and gas
    /// limit and the transaction is broadcast. Offline the chain and nonce
    /// must be given and the raw transaction is printed for external
    /// broadcasting.
    Register {
        /// Path to the EIP-2335 keystore file
        keystore: PathBuf,

        /// Whether the validator only relays OFAC-compliant blocks (true|false)
        #[arg(value_parser = parse_ofac, action = clap::ArgAction::Set)]
        ofac: bool,

        /// Beneficiary wallet address; pays gas and receives rewards
        beneficiary_address: Address,

        #[command(flatten)]
        password: PasswordArgs,

        #[command(flatten)]
        tx: TxArgs,

        /// Skip re-verifying the signature. You might waste gas.
        #[arg(long)]
        no_verify: bool,

        /// Output format (text|json)
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Broadcast a raw signed transaction and wait for its receipt
    Broadcast {
        /// JSON-RPC endpoint
        endpoint: String,

        /// Raw signed transaction (hex)
        raw_transaction: String,
    },

    /// Print the validator secret key stored in a keystore
    ///
    /// DANGER: anyone holding the printed key controls the validator.
    ExtractKey {
        /// Path to the EIP-2335 keystore file
        keystore: PathBuf,

        #[command(flatten)]
        password: PasswordArgs,
    },

    /// Utilities for managing client configuration
    Config {
        #[command(subcommand)]
        command: config::ConfigCommand,
    },
}

/// Execute a subcommand
pub async fn execute(home: &Path, command: Command) -> Result<()> {
    let config = ClientConfig::load(home)?;

    match command {
        Command::Sign {
            keystore,
            password,
            no_verify,
            output,
        } => sign::execute(
            &keystore,
            &password,
            run_options(&config, None, no_verify),
            output,
        ),

        Command::Verify {
            public_key,
            message,
            signature,
        } => verify::execute(&public_key, &message, &signature),

        Command::BuildTransaction {
            public_key,
            message,
            signature,
            ofac,
            beneficiary_address,
            tx,
            no_verify,
            broadcast,
            output,
        } => {
            build::execute(
                &config,
                build::BuildRequest {
                    public_key,
                    message,
                    signature,
                    ofac,
                    beneficiary: beneficiary_address,
                    no_verify,
                    broadcast,
                },
                &tx,
                output,
            )
            .await
        }

        Command::Register {
            keystore,
            ofac,
            beneficiary_address,
            password,
            tx,
            no_verify,
            output,
        } => {
            register::execute(
                &config,
                &keystore,
                ofac,
                beneficiary_address,
                &password,
                &tx,
                no_verify,
                output,
            )
            .await
        }

        Command::Broadcast {
            endpoint,
            raw_transaction,
        } => {
            broadcast::execute(&endpoint, &raw_transaction, config.receipt_poll_interval()).await
        }

        Command::ExtractKey { keystore, password } => extract::execute(&keystore, &password),

        Command::Config { command } => config::execute(home, &config, command),
    }
}

/// Output format of commands that print results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Keystore password input
#[derive(Clone, Args)]
pub struct PasswordArgs {
    /// Keystore password (prompted with hidden input when absent)
    #[arg(long, env = "MEVREG_KEYSTORE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Read the keystore password from a file
    #[arg(long, conflicts_with = "password")]
    pub password_file: Option<PathBuf>,
}

impl PasswordArgs {
    pub fn source(&self) -> Result<Box<dyn SecretSource>> {
        resolve_source(self.password.clone(), self.password_file.as_deref())
    }
}

/// Transaction construction flags shared by `build-transaction` and `register`
#[derive(Clone, Args)]
pub struct TxArgs {
    /// Beneficiary wallet private key (prompted with hidden input when absent)
    #[arg(long, env = "MEVREG_BENEFICIARY_KEY", hide_env_values = true)]
    pub beneficiary_key: Option<String>,

    /// Read the beneficiary wallet private key from a file
    #[arg(long, conflicts_with = "beneficiary_key")]
    pub beneficiary_key_file: Option<PathBuf>,

    /// JSON-RPC endpoint; enables online mode
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Ignore an endpoint stored in client.toml
    #[arg(long, conflicts_with = "endpoint")]
    pub offline: bool,

    /// Chain name for offline mode (mainnet|goerli)
    #[arg(long)]
    pub chain: Option<String>,

    /// Nonce of the beneficiary wallet; required offline
    #[arg(long)]
    pub nonce: Option<u64>,

    /// Local contract ABI file
    #[arg(long)]
    pub abi_file: Option<PathBuf>,

    /// URL to download the contract ABI from
    #[arg(long, conflicts_with = "abi_file")]
    pub abi_url: Option<String>,

    /// Gas limit (offline default: 150000; estimated online)
    #[arg(long)]
    pub gas: Option<u64>,

    /// Max fee per gas, in --fee-unit (default: 10 gwei)
    #[arg(long)]
    pub max_fee_per_gas: Option<String>,

    /// Max priority fee per gas, in --fee-unit (default: 0.1 gwei)
    #[arg(long)]
    pub max_priority_fee_per_gas: Option<String>,

    /// Unit of fee amounts (gwei|wei)
    #[arg(long)]
    pub fee_unit: Option<FeeUnit>,

    /// Require every fee parameter instead of falling back to defaults
    #[arg(long)]
    pub no_default_fees: bool,

    /// Registration proxy contract address
    #[arg(long)]
    pub contract: Option<Address>,
}

impl TxArgs {
    /// Merge flags with `client.toml`; flags win
    pub fn settings(
        &self,
        config: &ClientConfig,
        options: &RunOptions,
        beneficiary: Address,
        ofac: bool,
    ) -> Result<TxSettings> {
        let endpoint = if self.offline {
            None
        } else {
            self.endpoint
                .clone()
                .or_else(|| config.effective_endpoint().map(str::to_string))
        };

        let abi = match (&self.abi_file, &self.abi_url) {
            (Some(path), _) => AbiSource::File(path.clone()),
            (None, Some(url)) => AbiSource::Url(url.clone()),
            (None, None) => match config.effective_abi_file() {
                Some(path) => AbiSource::File(path),
                None => AbiSource::Url(config.abi_url.clone()),
            },
        };

        let contract = match self.contract {
            Some(contract) => contract,
            None => config.effective_contract_address()?,
        };

        Ok(TxSettings {
            endpoint,
            chain: self.chain.clone().unwrap_or_else(|| config.chain.clone()),
            nonce: self.nonce,
            fees: FeeOverrides {
                gas_limit: self.gas,
                max_fee_per_gas: self.max_fee_per_gas.clone(),
                max_priority_fee_per_gas: self.max_priority_fee_per_gas.clone(),
                unit: options.fee_unit,
                use_defaults: !self.no_default_fees,
            },
            contract,
            beneficiary,
            ofac,
            abi,
            poll_interval: config.receipt_poll_interval(),
        })
    }

    pub fn beneficiary_source(&self) -> Result<Box<dyn SecretSource>> {
        resolve_source(
            self.beneficiary_key.clone(),
            self.beneficiary_key_file.as_deref(),
        )
    }
}

/// Combine command flags with `client.toml`
pub fn run_options(config: &ClientConfig, fee_unit: Option<FeeUnit>, no_verify: bool) -> RunOptions {
    RunOptions {
        skip_verification: no_verify || config.skip_verification,
        fee_unit: fee_unit.unwrap_or(config.fee_unit),
    }
}

/// Parse the OFAC flag
///
/// Accepts y/yes/t/true/on/1 and n/no/f/false/off/0, case-insensitively.
pub fn parse_ofac(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Ok(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Ok(false),
        other => Err(format!(
            "invalid truth value {:?} (expected true or false)",
            other
        )),
    }
}

/// Print what a registration run produced
pub(crate) fn print_outcome(outcome: &RegistrationOutcome, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            let value = json!({
                "validator": payload_json(&outcome.payload),
                "transaction": outcome.intent,
                "rawTransaction": outcome.signed.to_hex(),
                "transactionHash": outcome.signed.hash(),
                "receipt": outcome.receipt,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            print_payload(&outcome.payload);
            println!();
            println!("Transaction:");
            println!("{}", serde_json::to_string_pretty(&outcome.intent)?);
            println!();
            println!("Raw signed transaction: {}", outcome.signed.to_hex());
            println!("Transaction hash:       {}", outcome.signed.hash());

            match &outcome.receipt {
                Some(receipt) => print_receipt(receipt),
                None => {
                    println!();
                    println!("The transaction was not broadcast. Submit it with");
                    println!("  mevreg broadcast <endpoint> <raw-transaction>");
                    println!("or any service that accepts raw signed transactions.");
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn payload_json(payload: &SignaturePayload) -> serde_json::Value {
    json!({
        "publicKey": payload.public_key_hex(),
        "message": payload.message_hex(),
        "signature": payload.signature_hex(),
    })
}

pub(crate) fn print_payload(payload: &SignaturePayload) {
    println!("Validator public key: {}", payload.public_key_hex());
    println!("Message:              {}", payload.message_hex());
    println!("Signature:            {}", payload.signature_hex());
}

pub(crate) fn print_receipt(receipt: &Receipt) {
    println!();
    println!("Included in block {}", receipt.block_number);
    println!(
        "Status:   {}",
        if receipt.success { "success" } else { "reverted" }
    );
    println!("Gas used: {}", receipt.gas_used);
}
