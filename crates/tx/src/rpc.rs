//! Ethereum JSON-RPC collaborator
//!
//! Only the handful of `eth_*` methods the registration flow needs. The
//! trait is the seam tests replace with in-memory stubs.

use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256, U256, U64};
use async_trait::async_trait;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use serde::{Deserialize, Serialize};

use crate::error::{TxError, TxResult};

/// Request timeout for a single JSON-RPC call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Call object for `eth_estimateGas`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

/// The receipt fields the registration flow reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: B256,
    /// `None` while the transaction is pending
    #[serde(default)]
    pub block_number: Option<U64>,
    /// 1 for success, 0 for revert
    #[serde(default)]
    pub status: Option<U64>,
    pub gas_used: U64,
}

/// Node queries used by online construction and broadcasting
#[async_trait]
pub trait EthRpc: Send + Sync {
    /// `eth_chainId`
    async fn chain_id(&self) -> TxResult<u64>;

    /// `eth_getTransactionCount(address, "pending")`
    async fn transaction_count(&self, address: Address) -> TxResult<u64>;

    /// `eth_estimateGas`
    async fn estimate_gas(&self, request: &CallRequest) -> TxResult<u64>;

    /// `eth_sendRawTransaction`, returning the transaction hash
    async fn send_raw_transaction(&self, raw: &Bytes) -> TxResult<B256>;

    /// `eth_getTransactionReceipt`
    async fn transaction_receipt(&self, hash: B256) -> TxResult<Option<RpcReceipt>>;
}

/// [`EthRpc`] over HTTP
#[derive(Clone)]
pub struct HttpEthRpc {
    client: HttpClient,
    endpoint: String,
}

impl HttpEthRpc {
    /// Connect to `endpoint` with the default request timeout
    pub fn new(endpoint: &str) -> TxResult<Self> {
        Self::with_timeout(endpoint, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(endpoint: &str, timeout: Duration) -> TxResult<Self> {
        let client = HttpClientBuilder::default()
            .request_timeout(timeout)
            .build(endpoint)
            .map_err(|source| TxError::Transport {
                method: "connect",
                source,
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl std::fmt::Debug for HttpEthRpc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEthRpc")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn transport(method: &'static str) -> impl FnOnce(jsonrpsee::core::ClientError) -> TxError {
    move |source| TxError::Transport { method, source }
}

#[async_trait]
impl EthRpc for HttpEthRpc {
    async fn chain_id(&self) -> TxResult<u64> {
        let id: U64 = self
            .client
            .request("eth_chainId", rpc_params![])
            .await
            .map_err(transport("eth_chainId"))?;
        Ok(id.to())
    }

    async fn transaction_count(&self, address: Address) -> TxResult<u64> {
        let count: U64 = self
            .client
            .request("eth_getTransactionCount", rpc_params![address, "pending"])
            .await
            .map_err(transport("eth_getTransactionCount"))?;
        Ok(count.to())
    }

    async fn estimate_gas(&self, request: &CallRequest) -> TxResult<u64> {
        let gas: U64 = self
            .client
            .request("eth_estimateGas", rpc_params![request])
            .await
            .map_err(transport("eth_estimateGas"))?;
        Ok(gas.to())
    }

    async fn send_raw_transaction(&self, raw: &Bytes) -> TxResult<B256> {
        self.client
            .request("eth_sendRawTransaction", rpc_params![raw])
            .await
            .map_err(transport("eth_sendRawTransaction"))
    }

    async fn transaction_receipt(&self, hash: B256) -> TxResult<Option<RpcReceipt>> {
        self.client
            .request("eth_getTransactionReceipt", rpc_params![hash])
            .await
            .map_err(transport("eth_getTransactionReceipt"))
    }
}
