//! Contract ABI loading
//!
//! The registration contract's ABI comes from a local JSON file or is
//! downloaded from a fixed URL. Either way it must describe
//! `add_validator(bytes,bytes,bytes,bool)`.

use std::path::Path;

use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::Selector;

use crate::error::{TxError, TxResult};

/// Where the proxy contract ABI is published
pub const DEFAULT_ABI_URL: &str = "https://unpool.fi/contracts/proxy_abi.json";

/// Name of the registration function
pub const REGISTRATION_FUNCTION: &str = "add_validator";

/// Expected input types of the registration function
pub const REGISTRATION_INPUTS: [&str; 4] = ["bytes", "bytes", "bytes", "bool"];

/// A parsed contract ABI known to contain the registration function
#[derive(Debug, Clone)]
pub struct ContractAbi {
    function: Function,
}

impl ContractAbi {
    /// Parse an ABI from JSON text
    pub fn from_json(json: &str) -> TxResult<Self> {
        let abi: JsonAbi = serde_json::from_str(json).map_err(|e| TxError::AbiLoad {
            origin: "JSON".to_string(),
            reason: e.to_string(),
        })?;
        Self::new(abi)
    }

    /// Load an ABI from a file
    pub fn load<P: AsRef<Path>>(path: P) -> TxResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| TxError::AbiLoad {
            origin: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let abi = Self::from_json(&json).map_err(|e| match e {
            TxError::AbiLoad { reason, .. } => TxError::AbiLoad {
                origin: path.display().to_string(),
                reason,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded contract ABI");
        Ok(abi)
    }

    /// Download an ABI over HTTPS
    pub async fn fetch(url: &str) -> TxResult<Self> {
        tracing::info!(url, "fetching contract ABI");
        let fetch_err = |source| TxError::AbiFetch {
            url: url.to_string(),
            source,
        };
        let body = reqwest::get(url)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_err)?
            .text()
            .await
            .map_err(fetch_err)?;
        Self::from_json(&body)
    }

    /// Validate that `abi` describes the registration function
    pub fn new(abi: JsonAbi) -> TxResult<Self> {
        let candidates = abi.function(REGISTRATION_FUNCTION).ok_or_else(|| {
            TxError::AbiMismatch(format!("no function named {}", REGISTRATION_FUNCTION))
        })?;

        let function = candidates
            .iter()
            .find(|f| {
                f.inputs
                    .iter()
                    .map(|p| p.ty.as_str())
                    .eq(REGISTRATION_INPUTS.iter().copied())
            })
            .cloned()
            .ok_or_else(|| {
                let found: Vec<String> = candidates.iter().map(|f| f.signature()).collect();
                TxError::AbiMismatch(format!(
                    "expected {}({}), found {}",
                    REGISTRATION_FUNCTION,
                    REGISTRATION_INPUTS.join(","),
                    found.join(", ")
                ))
            })?;

        Ok(Self { function })
    }

    /// The registration function entry
    pub fn function(&self) -> &Function {
        &self.function
    }

    /// Selector of the registration function
    pub fn selector(&self) -> Selector {
        self.function.selector()
    }
}
