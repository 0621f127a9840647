//! mevreg command-line client
//!
//! Registers a validator with the MEV smoothing proxy contract. The binary
//! is a thin clap front end; the pieces below are shared with the tests:
//!
//! - [`client_config`]: persistent defaults in `{home}/config/client.toml`
//! - [`secrets`]: keystore passwords and wallet keys from flags, files or
//!   the terminal
//! - [`pipeline`]: the registration pipeline (preconditions, signing,
//!   transaction building, broadcasting)
//! - [`commands`]: one module per subcommand

pub mod client_config;
pub mod commands;
pub mod pipeline;
pub mod secrets;

pub use client_config::{ClientConfig, CLIENT_CONFIG_FILENAME};
pub use commands::{parse_ofac, OutputFormat, PasswordArgs, TxArgs};
pub use pipeline::{
    decrypt_keystore, AbiSource, Registration, RegistrationOutcome, RunOptions, SignatureSource,
    TxSettings, MAX_PASSWORD_ATTEMPTS,
};
pub use secrets::{FixedSource, PromptSource, SecretSource};

/// Environment variable overriding the home directory
pub const MEVREG_HOME_ENV: &str = "MEVREG_HOME";

/// Home directory name under the user's home
pub const DEFAULT_HOME_DIR: &str = ".mevreg";
