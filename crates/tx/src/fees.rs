//! Fee model
//!
//! Offline runs fall back to static defaults; online runs leave the gas
//! limit to `eth_estimateGas`. Amounts are decimal strings in a [`FeeUnit`].

use std::fmt;
use std::str::FromStr;

use alloy_primitives::utils::parse_units;
use serde::{Deserialize, Serialize};

use crate::error::{TxError, TxResult};

/// Default gas limit for `add_validator`
pub const DEFAULT_GAS_LIMIT: u64 = 150_000;

/// Default max fee per gas: 10 gwei
pub const DEFAULT_MAX_FEE_PER_GAS: u128 = 10_000_000_000;

/// Default max priority fee per gas: 0.1 gwei
pub const DEFAULT_MAX_PRIORITY_FEE_PER_GAS: u128 = 100_000_000;

/// Unit that fee amounts are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeUnit {
    #[default]
    Gwei,
    Wei,
}

impl FeeUnit {
    fn as_str(self) -> &'static str {
        match self {
            FeeUnit::Gwei => "gwei",
            FeeUnit::Wei => "wei",
        }
    }

    /// Convert a decimal amount in this unit to wei
    pub fn to_wei(self, amount: &str) -> TxResult<u128> {
        let amount = amount.trim();
        if amount.starts_with('-') {
            return Err(TxError::InvalidFee(format!("negative amount {}", amount)));
        }
        let wei = parse_units(amount, self.as_str())
            .map_err(|e| TxError::InvalidFee(format!("{:?} {}: {}", amount, self, e)))?
            .get_absolute();
        u128::try_from(wei)
            .map_err(|_| TxError::InvalidFee(format!("{} {} does not fit in u128 wei", amount, self)))
    }
}

impl FromStr for FeeUnit {
    type Err = TxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gwei" => Ok(FeeUnit::Gwei),
            "wei" => Ok(FeeUnit::Wei),
            other => Err(TxError::InvalidFee(format!(
                "unknown fee unit {:?} (expected gwei or wei)",
                other
            ))),
        }
    }
}

impl fmt::Display for FeeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator-supplied fee values
#[derive(Debug, Clone, Default)]
pub struct FeeOverrides {
    pub gas_limit: Option<u64>,
    /// Decimal amount in `unit`
    pub max_fee_per_gas: Option<String>,
    /// Decimal amount in `unit`
    pub max_priority_fee_per_gas: Option<String>,
    pub unit: FeeUnit,
    /// When false, absent fields are errors instead of defaults
    pub use_defaults: bool,
}

impl FeeOverrides {
    /// Overrides that take every default
    pub fn defaults() -> Self {
        Self {
            use_defaults: true,
            ..Self::default()
        }
    }
}

/// Resolved fee parameters, all in wei
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeParameters {
    /// `None` means "estimate through the node"
    pub gas_limit: Option<u64>,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// Which construction path a fee resolution is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeMode {
    Online,
    Offline,
}

/// Resolve fee parameters for `mode`
///
/// Online, an explicit gas limit is kept and an absent one is left for
/// estimation.
pub fn resolve(mode: FeeMode, overrides: &FeeOverrides) -> TxResult<FeeParameters> {
    let gas_limit = match (overrides.gas_limit, mode) {
        (Some(gas), _) => Some(gas),
        (None, FeeMode::Online) => None,
        (None, FeeMode::Offline) if overrides.use_defaults => Some(DEFAULT_GAS_LIMIT),
        (None, FeeMode::Offline) => return Err(TxError::MissingFeeParameter("gas limit")),
    };
    if gas_limit == Some(0) {
        return Err(TxError::InvalidFee("gas limit must be positive".to_string()));
    }

    let max_fee_per_gas = resolve_amount(
        overrides.max_fee_per_gas.as_deref(),
        overrides,
        "max fee per gas",
        DEFAULT_MAX_FEE_PER_GAS,
    )?;
    let max_priority_fee_per_gas = resolve_amount(
        overrides.max_priority_fee_per_gas.as_deref(),
        overrides,
        "max priority fee per gas",
        DEFAULT_MAX_PRIORITY_FEE_PER_GAS,
    )?;

    if max_priority_fee_per_gas > max_fee_per_gas {
        return Err(TxError::InvalidFee(format!(
            "max priority fee per gas ({} wei) exceeds max fee per gas ({} wei)",
            max_priority_fee_per_gas, max_fee_per_gas
        )));
    }

    Ok(FeeParameters {
        gas_limit,
        max_fee_per_gas,
        max_priority_fee_per_gas,
    })
}

fn resolve_amount(
    value: Option<&str>,
    overrides: &FeeOverrides,
    field: &'static str,
    default: u128,
) -> TxResult<u128> {
    match value {
        Some(amount) => overrides.unit.to_wei(amount),
        None if overrides.use_defaults => Ok(default),
        None => Err(TxError::MissingFeeParameter(field)),
    }
}
