//! JSON-RPC Contract Client
//!
//! Issues `eth_call` requests against a node's HTTP endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::abi::{self, selector};
use super::error::{RpcError, RpcResult};
use super::fixed_point::FixedPoint;
use super::types::{Address, NavEntry, PositionInfo};
use super::ContractReader;

/// JSON-RPC client bound to one fund contract
pub struct ContractClient {
    client: Client,
    config: ContractClientConfig,
}

/// Configuration for the contract client
#[derive(Debug, Clone)]
pub struct ContractClientConfig {
    /// Node HTTP endpoint
    pub rpc_url: String,
    /// Fund contract address
    pub contract_address: Address,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl ContractClient {
    pub fn new(config: ContractClientConfig) -> RpcResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ContractClientConfig {
        &self.config
    }

    /// Chain id reported by the RPC endpoint (`eth_chainId`)
    pub async fn chain_id(&self) -> RpcResult<u64> {
        let result = self.request("eth_chainId", serde_json::json!([])).await?;
        let hex = result
            .as_str()
            .ok_or_else(|| RpcError::Malformed(format!("eth_chainId returned {}", result)))?;
        let digits = hex
            .strip_prefix("0x")
            .ok_or_else(|| RpcError::Malformed(format!("eth_chainId returned {:?}", hex)))?;

        u64::from_str_radix(digits, 16)
            .map_err(|e| RpcError::Malformed(format!("eth_chainId {:?}: {}", hex, e)))
    }

    /// Execute a read-only call against the fund contract and return raw bytes
    async fn call(&self, data: Vec<u8>) -> RpcResult<Vec<u8>> {
        let call = CallObject {
            to: self.config.contract_address.to_string(),
            data: abi::to_hex(&data),
        };
        let result = self
            .request("eth_call", serde_json::json!([call, "latest"]))
            .await?;

        let hex = result
            .as_str()
            .ok_or_else(|| RpcError::Malformed(format!("eth_call returned {}", result)))?;
        let bytes = abi::from_hex(hex)?;

        // Calling a non-contract address yields empty data rather than an error
        if bytes.is_empty() {
            return Err(RpcError::Malformed("empty return data".to_string()));
        }
        Ok(bytes)
    }

    /// Send one JSON-RPC request and unwrap its `result`
    async fn request(&self, method: &str, params: serde_json::Value) -> RpcResult<serde_json::Value> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            id: &request_id,
            method,
            params,
        };

        tracing::debug!(request_id = %request_id, method, "Sending RPC request");

        let response = self
            .client
            .post(&self.config.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(RpcError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(request_id = %request_id, status = status.as_u16(), "RPC endpoint HTTP error");
            return Err(RpcError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let reply: JsonRpcResponse = response.json().await.map_err(RpcError::from_reqwest)?;

        if let Some(err) = reply.error {
            tracing::debug!(request_id = %request_id, code = err.code, message = %err.message, "RPC error");
            return Err(RpcError::Node {
                code: err.code,
                message: err.message,
            });
        }

        reply
            .result
            .ok_or_else(|| RpcError::Malformed("response has neither result nor error".to_string()))
    }
}

#[async_trait]
impl ContractReader for ContractClient {
    async fn name(&self) -> RpcResult<String> {
        let data = self.call(abi::encode_call(selector::NAME)).await?;
        abi::decode_string(&data)
    }

    async fn description(&self) -> RpcResult<String> {
        let data = self.call(abi::encode_call(selector::DESCRIPTION)).await?;
        abi::decode_string(&data)
    }

    async fn current_nav(&self) -> RpcResult<FixedPoint> {
        let data = self.call(abi::encode_call(selector::CURRENT_NAV)).await?;
        abi::decode_fixed(&data, 0)
    }

    async fn total_supply(&self) -> RpcResult<FixedPoint> {
        let data = self.call(abi::encode_call(selector::TOTAL_SUPPLY)).await?;
        abi::decode_fixed(&data, 0)
    }

    async fn inception_date(&self) -> RpcResult<u64> {
        let data = self.call(abi::encode_call(selector::INCEPTION_DATE)).await?;
        abi::decode_u64(&data, 0)
    }

    async fn nav_history_length(&self) -> RpcResult<u64> {
        let data = self.call(abi::encode_call(selector::NAV_HISTORY_LENGTH)).await?;
        abi::decode_u64(&data, 0)
    }

    async fn nav_history_at(&self, index: u64) -> RpcResult<NavEntry> {
        let data = self
            .call(abi::encode_call_uint(selector::NAV_HISTORY, index))
            .await?;
        abi::decode_nav_entry(&data)
    }

    async fn whitelist_status(&self, address: &Address) -> RpcResult<bool> {
        let data = self
            .call(abi::encode_call_address(selector::WHITELIST, address))
            .await?;
        abi::decode_bool(&data, 0)
    }

    async fn balance_of(&self, address: &Address) -> RpcResult<FixedPoint> {
        let data = self
            .call(abi::encode_call_address(selector::BALANCE_OF, address))
            .await?;
        abi::decode_fixed(&data, 0)
    }

    async fn value_of(&self, address: &Address) -> RpcResult<FixedPoint> {
        let data = self
            .call(abi::encode_call_address(selector::VALUE_OF, address))
            .await?;
        abi::decode_fixed(&data, 0)
    }

    async fn return_of(&self, address: &Address) -> RpcResult<i128> {
        let data = self
            .call(abi::encode_call_address(selector::RETURN_OF, address))
            .await?;
        abi::decode_i128(&data, 0)
    }

    async fn position_info(&self, address: &Address) -> RpcResult<PositionInfo> {
        let data = self
            .call(abi::encode_call_address(selector::POSITION_INFO, address))
            .await?;
        abi::decode_position_info(&data)
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: &'a str,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct CallObject {
    to: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}
