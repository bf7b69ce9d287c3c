//! HyperEVM JSON-RPC client.

use anyhow::{Context, Result};
use primitive_types::U256;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::instrument;

use super::types::{RpcError, RpcRequest, RpcResponse};

/// JSON-RPC URL for the HyperEVM mainnet.
const MAINNET_RPC_URL: &str = "https://rpc.hyperliquid.xyz/evm";

/// ERC-20 `balanceOf(address)` function selector.
const BALANCE_OF_SELECTOR: &str = "0x70a08231";

/// One whole token in the chain's 18-decimal fixed-point representation.
const WEI_PER_UNIT: f64 = 1e18;

/// JSON-RPC client for read-only HyperEVM balance queries.
#[derive(Debug, Clone)]
pub struct EvmClient {
    client: Client,
    rpc_url: String,
}

impl EvmClient {
    /// Create a new client against the mainnet RPC endpoint.
    pub fn new() -> Result<Self> {
        Self::with_url(MAINNET_RPC_URL)
    }

    /// Create a new client with a custom RPC URL.
    pub fn with_url(rpc_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            rpc_url: rpc_url.to_string(),
        })
    }

    /// Issue a JSON-RPC call and return the hex-string result.
    async fn call(&self, method: &str, params: serde_json::Value) -> Result<String, RpcError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response = self.client.post(&self.rpc_url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RpcError::Http { status, body });
        }

        let body = response.text().await?;
        let parsed: RpcResponse = serde_json::from_str(&body)?;

        if let Some(err) = parsed.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        parsed.result.ok_or(RpcError::MissingResult)
    }

    /// Get an ERC-20 token balance of `holder`, in whole tokens.
    #[instrument(skip(self), name = "evm_erc20_balance")]
    pub async fn erc20_balance(&self, token: &str, holder: &str) -> Result<f64, RpcError> {
        let data = encode_balance_of(holder);
        let result = self
            .call("eth_call", json!([{ "to": token, "data": data }, "latest"]))
            .await?;
        wei_to_units(&result)
    }

    /// Get the native balance of `address`, in whole tokens.
    #[instrument(skip(self), name = "evm_native_balance")]
    pub async fn native_balance(&self, address: &str) -> Result<f64, RpcError> {
        let result = self
            .call("eth_getBalance", json!([address, "latest"]))
            .await?;
        wei_to_units(&result)
    }
}

/// Encode `balanceOf(address)` call data: the 4-byte selector followed by
/// the address left-padded with zeros to a 32-byte word.
pub fn encode_balance_of(holder: &str) -> String {
    let addr = holder.to_lowercase();
    let addr = addr.trim_start_matches("0x");
    format!("{}{:0>64}", BALANCE_OF_SELECTOR, addr)
}

/// Convert a hex-encoded 256-bit quantity to whole tokens (18 decimals).
///
/// Decoding stays exact through [`U256`]; precision is only lost in the
/// final floating-point division.
pub fn wei_to_units(hex: &str) -> Result<f64, RpcError> {
    let digits = hex.trim().trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(0.0);
    }

    let raw = U256::from_str_radix(digits, 16)
        .map_err(|_| RpcError::InvalidHex(hex.to_string()))?;

    Ok(raw.to_string().parse::<f64>().unwrap_or(0.0) / WEI_PER_UNIT)
}
