//! Static chain table

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TxError;

/// Chains the registration contract is deployed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Mainnet,
    #[default]
    Goerli,
}

impl Chain {
    /// All known chains
    pub const ALL: [Chain; 2] = [Chain::Mainnet, Chain::Goerli];

    /// EIP-155 chain id
    pub const fn chain_id(self) -> u64 {
        match self {
            Chain::Mainnet => 1,
            Chain::Goerli => 5,
        }
    }

    /// Lower-case chain name
    pub const fn name(self) -> &'static str {
        match self {
            Chain::Mainnet => "mainnet",
            Chain::Goerli => "goerli",
        }
    }

    /// Reverse lookup by chain id
    pub fn from_id(chain_id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.chain_id() == chain_id)
    }
}

impl FromStr for Chain {
    type Err = TxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == lower)
            .ok_or_else(|| TxError::UnknownChain(s.to_string()))
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_ids() {
        assert_eq!("mainnet".parse::<Chain>().unwrap().chain_id(), 1);
        assert_eq!("goerli".parse::<Chain>().unwrap().chain_id(), 5);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!("GoErLi".parse::<Chain>().unwrap(), Chain::Goerli);
    }

    #[test]
    fn test_unknown_chain() {
        let err = "sepolia".parse::<Chain>().unwrap_err();
        assert!(matches!(err, TxError::UnknownChain(ref name) if name == "sepolia"));
    }

    #[test]
    fn test_from_id() {
        assert_eq!(Chain::from_id(1), Some(Chain::Mainnet));
        assert_eq!(Chain::from_id(11155111), None);
    }
}
