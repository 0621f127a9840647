//! Client configuration
//!
//! Persistent defaults for registration commands live in
//! `{home}/config/client.toml`. Every value can be overridden per invocation
//! with the matching command-line flag.
//!
//! # Example client.toml
//!
//! ```toml
//! # Chain used in offline mode (mainnet|goerli)
//! chain = "goerli"
//!
//! # JSON-RPC endpoint; empty means offline
//! endpoint = ""
//!
//! # Registration proxy contract
//! contract-address = "0x606A1cB03cED72Cb1C7D0cdCcb630eDba2eF6231"
//!
//! # Local ABI file; when empty the ABI is downloaded from abi-url
//! abi-file = ""
//! abi-url = "https://unpool.fi/contracts/proxy_abi.json"
//!
//! # Unit of fee amounts (gwei|wei)
//! fee-unit = "gwei"
//!
//! # Skip the BLS self-check after signing
//! skip-verification = false
//!
//! # Interval between receipt queries after broadcasting
//! receipt-poll-interval-ms = 1000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy_primitives::Address;
use anyhow::{Context, Result};
use mevreg_tx::{Chain, FeeUnit, DEFAULT_ABI_URL, DEFAULT_CONTRACT_ADDRESS, DEFAULT_POLL_INTERVAL};
use serde::{Deserialize, Serialize};

/// Default client configuration filename.
pub const CLIENT_CONFIG_FILENAME: &str = "client.toml";

/// Client configuration for registration commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    /// Chain name used to pick the chain id offline.
    #[serde(default = "default_chain")]
    pub chain: String,

    /// JSON-RPC endpoint. Empty selects offline mode.
    #[serde(default)]
    pub endpoint: String,

    /// Address of the registration proxy contract.
    #[serde(default = "default_contract_address")]
    pub contract_address: String,

    /// Path to a local contract ABI file.
    ///
    /// If empty, the ABI is downloaded from `abi_url`.
    #[serde(default)]
    pub abi_file: String,

    /// Where to download the contract ABI from.
    #[serde(default = "default_abi_url")]
    pub abi_url: String,

    /// Unit of fee amounts given on the command line.
    #[serde(default)]
    pub fee_unit: FeeUnit,

    /// Skip re-verifying the BLS signature after signing.
    #[serde(default)]
    pub skip_verification: bool,

    /// Receipt polling interval in milliseconds.
    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,
}

fn default_chain() -> String {
    Chain::default().name().to_string()
}

fn default_contract_address() -> String {
    DEFAULT_CONTRACT_ADDRESS.to_checksum(None)
}

fn default_abi_url() -> String {
    DEFAULT_ABI_URL.to_string()
}

fn default_receipt_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            chain: default_chain(),
            endpoint: String::new(),
            contract_address: default_contract_address(),
            abi_file: String::new(),
            abi_url: default_abi_url(),
            fee_unit: FeeUnit::default(),
            skip_verification: false,
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
        }
    }
}

impl ClientConfig {
    /// Get the path to the client config file.
    pub fn config_path(home: &Path) -> PathBuf {
        home.join("config").join(CLIENT_CONFIG_FILENAME)
    }

    /// Load client configuration from file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load(home: &Path) -> Result<Self> {
        let config_path = Self::config_path(home);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read client config: {}", config_path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse client config: {}", config_path.display()))
    }

    /// Save client configuration to file.
    pub fn save(&self, home: &Path) -> Result<()> {
        let config_path = Self::config_path(home);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize client config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write client config: {}", config_path.display()))?;

        Ok(())
    }

    /// Configured endpoint, if any.
    pub fn effective_endpoint(&self) -> Option<&str> {
        let endpoint = self.endpoint.trim();
        (!endpoint.is_empty()).then_some(endpoint)
    }

    /// Configured ABI file, if any.
    pub fn effective_abi_file(&self) -> Option<PathBuf> {
        let path = self.abi_file.trim();
        (!path.is_empty()).then(|| PathBuf::from(path))
    }

    /// Parsed contract address, falling back to the default proxy.
    pub fn effective_contract_address(&self) -> Result<Address> {
        let address = self.contract_address.trim();
        if address.is_empty() {
            return Ok(DEFAULT_CONTRACT_ADDRESS);
        }
        address
            .parse()
            .with_context(|| format!("Invalid contract-address in client config: {}", address))
    }

    /// Receipt polling interval.
    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.chain, "goerli");
        assert_eq!(config.endpoint, "");
        assert_eq!(
            config.contract_address,
            "0x606A1cB03cED72Cb1C7D0cdCcb630eDba2eF6231"
        );
        assert_eq!(config.abi_url, DEFAULT_ABI_URL);
        assert_eq!(config.fee_unit, FeeUnit::Gwei);
        assert!(!config.skip_verification);
        assert_eq!(config.receipt_poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempdir().unwrap();
        let home = temp_dir.path();

        let config = ClientConfig {
            chain: "mainnet".to_string(),
            endpoint: "http://localhost:8545".to_string(),
            abi_file: "/tmp/proxy_abi.json".to_string(),
            fee_unit: FeeUnit::Wei,
            skip_verification: true,
            receipt_poll_interval_ms: 250,
            ..Default::default()
        };

        config.save(home).unwrap();

        let loaded = ClientConfig::load(home).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.effective_endpoint(), Some("http://localhost:8545"));
        assert_eq!(
            loaded.effective_abi_file(),
            Some(PathBuf::from("/tmp/proxy_abi.json"))
        );
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp_dir = tempdir().unwrap();
        let config = ClientConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.effective_endpoint(), None);
        assert_eq!(config.effective_abi_file(), None);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = tempdir().unwrap();
        let home = temp_dir.path();
        let path = ClientConfig::config_path(home);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "chain = \"mainnet\"\nfee-unit = \"wei\"\n").unwrap();

        let config = ClientConfig::load(home).unwrap();
        assert_eq!(config.chain, "mainnet");
        assert_eq!(config.fee_unit, FeeUnit::Wei);
        assert_eq!(config.abi_url, DEFAULT_ABI_URL);
        assert_eq!(config.receipt_poll_interval_ms, 1000);
    }

    #[test]
    fn test_effective_contract_address() {
        let config = ClientConfig {
            contract_address: String::new(),
            ..Default::default()
        };
        assert_eq!(
            config.effective_contract_address().unwrap(),
            DEFAULT_CONTRACT_ADDRESS
        );

        let bad = ClientConfig {
            contract_address: "0x1234".to_string(),
            ..Default::default()
        };
        assert!(bad.effective_contract_address().is_err());
    }

    #[test]
    fn test_toml_format() {
        let toml_str = toml::to_string_pretty(&ClientConfig::default()).unwrap();

        // Verify kebab-case keys
        assert!(toml_str.contains("contract-address"));
        assert!(toml_str.contains("abi-url"));
        assert!(toml_str.contains("fee-unit = \"gwei\""));
        assert!(toml_str.contains("receipt-poll-interval-ms"));
    }
}
