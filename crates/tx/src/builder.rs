//! Transaction construction
//!
//! Offline runs take every chain-dependent value from the operator and never
//! touch the network. Online runs ask the node for chain id, nonce and gas.

use alloy_primitives::{address, Address, U256};

use crate::abi::ContractAbi;
use crate::call::{check_selector, RegistrationCall};
use crate::chain::Chain;
use crate::error::{TxError, TxResult};
use crate::fees::{self, FeeMode, FeeOverrides, FeeParameters};
use crate::intent::TransactionIntent;
use crate::rpc::{CallRequest, EthRpc};

/// Address of the registration proxy contract
pub const DEFAULT_CONTRACT_ADDRESS: Address = address!("606a1cb03ced72cb1c7d0cdccb630edba2ef6231");

/// Validated offline preconditions
///
/// Built before any keystore is decrypted so a missing nonce or unknown chain
/// fails without doing cryptographic work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfflinePlan {
    pub chain: Chain,
    pub nonce: u64,
    pub fees: FeeParameters,
}

impl OfflinePlan {
    /// Check offline preconditions
    pub fn prepare(chain: &str, nonce: Option<u64>, overrides: &FeeOverrides) -> TxResult<Self> {
        let nonce = nonce.ok_or(TxError::MissingNonce)?;
        let chain: Chain = chain.parse()?;
        let fees = fees::resolve(FeeMode::Offline, overrides)?;
        Ok(Self { chain, nonce, fees })
    }

    fn gas_limit(&self) -> u64 {
        self.fees.gas_limit.unwrap_or(fees::DEFAULT_GAS_LIMIT)
    }
}

/// Construction mode
pub enum BuildMode<'a> {
    Offline(OfflinePlan),
    Online {
        rpc: &'a dyn EthRpc,
        fees: FeeParameters,
    },
}

/// Builds registration transactions against one contract
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    contract: Address,
    abi: ContractAbi,
}

impl TransactionBuilder {
    pub fn new(contract: Address, abi: ContractAbi) -> Self {
        Self { contract, abi }
    }

    /// Build through whichever path `mode` selects
    pub async fn build(
        &self,
        mode: BuildMode<'_>,
        sender: Address,
        call: &RegistrationCall,
    ) -> TxResult<TransactionIntent> {
        match mode {
            BuildMode::Offline(plan) => self.build_offline(&plan, call),
            BuildMode::Online { rpc, fees } => self.build_online(rpc, sender, call, &fees).await,
        }
    }

    /// Build without network access
    pub fn build_offline(
        &self,
        plan: &OfflinePlan,
        call: &RegistrationCall,
    ) -> TxResult<TransactionIntent> {
        check_selector(&self.abi)?;

        let intent = TransactionIntent {
            chain_id: plan.chain.chain_id(),
            nonce: plan.nonce,
            to: self.contract,
            input: call.encode_static(),
            value: U256::ZERO,
            gas_limit: plan.gas_limit(),
            max_fee_per_gas: plan.fees.max_fee_per_gas,
            max_priority_fee_per_gas: plan.fees.max_priority_fee_per_gas,
        };
        tracing::info!(
            chain = %plan.chain,
            nonce = intent.nonce,
            gas_limit = intent.gas_limit,
            "built offline registration transaction"
        );
        Ok(intent)
    }

    /// Build with chain id, nonce and gas limit taken from the node
    pub async fn build_online(
        &self,
        rpc: &dyn EthRpc,
        sender: Address,
        call: &RegistrationCall,
        fees: &FeeParameters,
    ) -> TxResult<TransactionIntent> {
        let input = call.encode_with_abi(&self.abi)?;

        let chain_id = rpc.chain_id().await?;
        let nonce = rpc.transaction_count(sender).await?;
        let gas_limit = match fees.gas_limit {
            Some(gas) => gas,
            None => {
                rpc.estimate_gas(&CallRequest {
                    from: sender,
                    to: self.contract,
                    data: input.clone(),
                    value: U256::ZERO,
                })
                .await?
            }
        };

        tracing::info!(
            chain_id,
            nonce,
            gas_limit,
            sender = %sender,
            "built online registration transaction"
        );

        Ok(TransactionIntent {
            chain_id,
            nonce,
            to: self.contract,
            input,
            value: U256::ZERO,
            gas_limit,
            max_fee_per_gas: fees.max_fee_per_gas,
            max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Bytes;

    fn builder() -> TransactionBuilder {
        let abi = ContractAbi::from_json(include_str!("../abi/proxy_abi.json")).unwrap();
        TransactionBuilder::new(DEFAULT_CONTRACT_ADDRESS, abi)
    }

    fn call() -> RegistrationCall {
        RegistrationCall {
            public_key: Bytes::from(vec![1u8; 48]),
            message: Bytes::from(vec![2u8; 16]),
            signature: Bytes::from(vec![3u8; 96]),
            ofac: false,
        }
    }

    #[test]
    fn test_prepare_requires_nonce() {
        let err = OfflinePlan::prepare("goerli", None, &FeeOverrides::defaults()).unwrap_err();
        assert!(matches!(err, TxError::MissingNonce));
    }

    #[test]
    fn test_prepare_rejects_unknown_chain() {
        let err = OfflinePlan::prepare("ropsten", Some(1), &FeeOverrides::defaults()).unwrap_err();
        assert!(matches!(err, TxError::UnknownChain(_)));
    }

    #[test]
    fn test_goerli_offline_example() {
        let plan = OfflinePlan::prepare("goerli", Some(5), &FeeOverrides::defaults()).unwrap();
        let intent = builder().build_offline(&plan, &call()).unwrap();

        assert_eq!(intent.chain_id, 5);
        assert_eq!(intent.nonce, 5);
        assert_eq!(intent.gas_limit, 150_000);
        assert_eq!(intent.value, U256::ZERO);
        assert_eq!(intent.to, DEFAULT_CONTRACT_ADDRESS);
        assert_eq!(&intent.input[..4], &RegistrationCall::selector());
    }

    #[test]
    fn test_default_contract_address() {
        assert_eq!(
            DEFAULT_CONTRACT_ADDRESS.to_checksum(None),
            "0x606A1cB03cED72Cb1C7D0cdCcb630eDba2eF6231"
        );
    }

    #[test]
    fn test_intent_json_shape() {
        let plan = OfflinePlan::prepare("mainnet", Some(0), &FeeOverrides::defaults()).unwrap();
        let intent = builder().build_offline(&plan, &call()).unwrap();
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["chainId"], 1);
        assert_eq!(json["gasLimit"], 150_000);
        assert!(json["input"].as_str().unwrap().starts_with("0x"));
    }
}
