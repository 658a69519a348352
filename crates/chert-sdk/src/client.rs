//! JSON-RPC client for the Chert ledger API.
//!
//! The client is an explicit context object: construct one, pass it around,
//! drop it when done. No process-wide defaults. Operation surfaces hang off
//! it as borrowing managers:
//!
//! ```rust,no_run
//! use chert_sdk::{ChertClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> chert_sdk::Result<()> {
//!     let client = ChertClient::new(ClientConfig::default())?;
//!     let account = client.wallet().create_account()?;
//!     println!("Created account: {}", account.address);
//!     Ok(())
//! }
//! ```

use chert_net::{Config as NetConfig, HttpClient};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Result, SdkError};
use crate::governance::GovernanceManager;
use crate::privacy::PrivacyManager;
use crate::staking::StakingManager;
use crate::types::{Block, Network, NetworkStatus, SubmitReceipt, Transaction, TransactionReceipt};
use crate::wallet::WalletManager;

pub const DEFAULT_ENDPOINT: &str = "https://api.chert.com";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub network: Network,
    pub endpoint: String,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: chert_net::DEFAULT_TIMEOUT_SECS,
            api_key: None,
            headers: Vec::new(),
        }
    }
}

impl ClientConfig {
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

pub struct ChertClient {
    config: ClientConfig,
    http: HttpClient,
}

impl ChertClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut net = NetConfig::default().with_timeout(config.timeout_secs);
        if let Some(key) = &config.api_key {
            net = net.with_api_key(key);
        }
        for (name, value) in &config.headers {
            net = net.with_header(name, value);
        }
        let http = HttpClient::new(net)?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn wallet(&self) -> WalletManager<'_> {
        WalletManager::new(self)
    }

    pub fn privacy(&self) -> PrivacyManager<'_> {
        PrivacyManager::new(self)
    }

    pub fn staking(&self) -> StakingManager<'_> {
        StakingManager::new(self)
    }

    pub fn governance(&self) -> GovernanceManager<'_> {
        GovernanceManager::new(self)
    }

    pub async fn get_network_status(&self) -> Result<NetworkStatus> {
        self.rpc_call("getNetworkStatus", Value::Null).await
    }

    pub async fn get_latest_block(&self) -> Result<Block> {
        self.rpc_call("getLatestBlock", Value::Null).await
    }

    pub async fn get_block(&self, height: u64) -> Result<Block> {
        self.rpc_call("getBlock", json!([height])).await
    }

    pub async fn get_transaction(&self, tx_hash: &str) -> Result<Transaction> {
        self.rpc_call("getTransaction", json!([tx_hash])).await
    }

    pub async fn is_connected(&self) -> bool {
        self.get_network_status().await.is_ok()
    }

    /// Submission side of the adapter contract: hand a finished payload to
    /// the ledger, get a transaction identifier back. No internal retries;
    /// resubmitting with a fresh nonce is a caller decision.
    pub async fn submit_payload(&self, method: &str, payload: Value) -> Result<SubmitReceipt> {
        self.rpc_call(method, json!([payload])).await
    }

    /// Polling side of the adapter contract.
    pub async fn poll_transaction(&self, transaction_id: &str) -> Result<TransactionReceipt> {
        if transaction_id.is_empty() {
            return Err(SdkError::validation(
                "transaction_id",
                "Transaction ID cannot be empty",
            ));
        }
        self.rpc_call("getTransactionStatus", json!([transaction_id]))
            .await
    }

    pub(crate) async fn rpc_call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        debug!(method, "RPC call");
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        let response = self.http.post(&self.config.endpoint, &request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SdkError::Api {
                code: "RPC_ERROR".to_string(),
                message: format!("HTTP {}: RPC call failed", status.as_u16()),
                status: Some(status.as_u16()),
            });
        }

        let body: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| SdkError::Serialization(format!("Invalid RPC response format: {}", e)))?;
        decode_rpc_response(body)
    }
}

fn decode_rpc_response<T: DeserializeOwned>(response: JsonRpcResponse) -> Result<T> {
    if let Some(error) = response.error {
        let code = match error.code {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => "RPC_ERROR".to_string(),
        };
        return Err(SdkError::Api {
            code,
            message: error.message.unwrap_or_else(|| "RPC call failed".to_string()),
            status: None,
        });
    }

    let result = response.result.ok_or_else(|| SdkError::Api {
        code: "RPC_ERROR".to_string(),
        message: "RPC response carried no result".to_string(),
        status: None,
    })?;

    serde_json::from_value(result)
        .map_err(|e| SdkError::Serialization(format!("Invalid RPC result: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Balance;

    fn parse(body: &str) -> JsonRpcResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn decodes_successful_result() {
        let response = parse(
            r#"{"jsonrpc":"2.0","result":{"available":"10","pending":"0","total":"10"},"id":1}"#,
        );
        let balance: Balance = decode_rpc_response(response).unwrap();
        assert_eq!(balance.total, "10");
    }

    #[test]
    fn maps_rpc_error_to_api_error() {
        let response =
            parse(r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"method not found"},"id":1}"#);
        match decode_rpc_response::<Balance>(response) {
            Err(SdkError::Api { code, message, .. }) => {
                assert_eq!(code, "-32601");
                assert_eq!(message, "method not found");
            }
            other => panic!("expected Api error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn string_error_codes_pass_through_unquoted() {
        let response = parse(
            r#"{"jsonrpc":"2.0","error":{"code":"INSUFFICIENT_FUNDS","message":"broke"},"id":1}"#,
        );
        match decode_rpc_response::<Balance>(response) {
            Err(SdkError::Api { code, .. }) => assert_eq!(code, "INSUFFICIENT_FUNDS"),
            other => panic!("expected Api error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn missing_result_is_an_api_error() {
        let response = parse(r#"{"jsonrpc":"2.0","id":1}"#);
        assert!(matches!(
            decode_rpc_response::<Balance>(response),
            Err(SdkError::Api { .. })
        ));
    }

    #[test]
    fn rpc_request_wire_shape() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: "getBalance",
            params: json!(["chert_abc"]),
            id: 1,
        };
        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(wire["jsonrpc"], "2.0");
        assert_eq!(wire["method"], "getBalance");
        assert_eq!(wire["params"][0], "chert_abc");
    }

    #[test]
    fn config_builder() {
        let config = ClientConfig::default()
            .with_network(Network::Testnet)
            .with_endpoint("https://testnet.chert.com")
            .with_timeout(5)
            .with_api_key("key")
            .with_header("X-Trace", "1");

        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.endpoint, "https://testnet.chert.com");
        assert_eq!(config.timeout_secs, 5);
        assert!(ChertClient::new(config).is_ok());
    }
}
