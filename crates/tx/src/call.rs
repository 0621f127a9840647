//! `add_validator` call encoding
//!
//! Two encoders produce the same bytes: a statically typed one generated by
//! `sol!` (offline) and a dynamic one driven by the loaded JSON ABI (online).

use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
use alloy_primitives::Bytes;
use alloy_sol_types::{sol, SolCall};
use mevreg_crypto::SignaturePayload;

use crate::abi::ContractAbi;
use crate::error::{TxError, TxResult};

sol! {
    /// Registers a validator with the proxy contract.
    function add_validator(bytes validatorPubKey, bytes message, bytes signature, bool isOfac) external;
}

/// Arguments of an `add_validator` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationCall {
    pub public_key: Bytes,
    pub message: Bytes,
    pub signature: Bytes,
    /// Operator's OFAC self-attestation
    pub ofac: bool,
}

impl RegistrationCall {
    /// Build call arguments from a signed registration message
    pub fn from_payload(payload: &SignaturePayload, ofac: bool) -> Self {
        Self {
            public_key: Bytes::copy_from_slice(&payload.public_key),
            message: Bytes::copy_from_slice(&payload.message),
            signature: Bytes::copy_from_slice(&payload.signature),
            ofac,
        }
    }

    /// Selector of `add_validator(bytes,bytes,bytes,bool)`
    pub fn selector() -> [u8; 4] {
        add_validatorCall::SELECTOR
    }

    /// Encode with the compiled-in function signature
    pub fn encode_static(&self) -> Bytes {
        add_validatorCall {
            validatorPubKey: self.public_key.clone(),
            message: self.message.clone(),
            signature: self.signature.clone(),
            isOfac: self.ofac,
        }
        .abi_encode()
        .into()
    }

    /// Encode through the loaded ABI
    pub fn encode_with_abi(&self, abi: &ContractAbi) -> TxResult<Bytes> {
        let values = [
            DynSolValue::Bytes(self.public_key.to_vec()),
            DynSolValue::Bytes(self.message.to_vec()),
            DynSolValue::Bytes(self.signature.to_vec()),
            DynSolValue::Bool(self.ofac),
        ];
        abi.function()
            .abi_encode_input(&values)
            .map(Bytes::from)
            .map_err(|e| TxError::Encoding(e.to_string()))
    }
}

/// Check that a loaded ABI agrees with the compiled-in signature
pub fn check_selector(abi: &ContractAbi) -> TxResult<()> {
    let selector = abi.selector();
    if selector.0 != RegistrationCall::selector() {
        return Err(TxError::AbiMismatch(format!(
            "selector {} does not match add_validator(bytes,bytes,bytes,bool) {}",
            selector,
            hex::encode(RegistrationCall::selector())
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;

    fn call() -> RegistrationCall {
        RegistrationCall {
            public_key: Bytes::from(vec![0xAA; 48]),
            message: Bytes::from(vec![0xBB; 16]),
            signature: Bytes::from(vec![0xCC; 96]),
            ofac: false,
        }
    }

    #[test]
    fn test_selector() {
        let expected = keccak256("add_validator(bytes,bytes,bytes,bool)");
        assert_eq!(RegistrationCall::selector(), expected[..4]);
    }

    #[test]
    fn test_static_encoding_layout() {
        let data = call().encode_static();
        assert_eq!(&data[..4], &RegistrationCall::selector());
        // 4 head words, then each bytes arg as length word + padded body
        let expected_len = 4 + 4 * 32 + (32 + 64) + (32 + 32) + (32 + 96);
        assert_eq!(data.len(), expected_len);
        // bool lives in the fourth head word
        assert_eq!(data[4 + 3 * 32 + 31], 0);
    }

    #[test]
    fn test_ofac_flag_encoded() {
        let mut c = call();
        c.ofac = true;
        let data = c.encode_static();
        assert_eq!(data[4 + 3 * 32 + 31], 1);
    }

    #[test]
    fn test_dynamic_matches_static() {
        let abi = ContractAbi::from_json(include_str!("../abi/proxy_abi.json")).unwrap();
        check_selector(&abi).unwrap();
        let c = call();
        assert_eq!(c.encode_with_abi(&abi).unwrap(), c.encode_static());
    }
}
