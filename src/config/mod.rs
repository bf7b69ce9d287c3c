//! Configuration management for the portfolio aggregator.
//!
//! Loads settings from environment variables and an optional config file.
//! Defaults carry the fixed mainnet constants: the tracked wallet, the
//! HyperLend wHYPE token contract and both upstream endpoints.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Wallet whose balances are aggregated
    #[serde(default = "default_wallet_address")]
    pub wallet_address: String,
    /// Hyperliquid info-endpoint settings
    #[serde(default)]
    pub hyperliquid: HyperliquidConfig,
    /// HyperEVM RPC settings
    #[serde(default)]
    pub evm: EvmConfig,
    /// Polling cadence for the binary
    #[serde(default)]
    pub poll: PollConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HyperliquidConfig {
    /// Base URL of the Hyperliquid API
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvmConfig {
    /// JSON-RPC URL of the HyperEVM endpoint
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// HyperLend wHYPE token contract queried via `balanceOf`
    #[serde(default = "default_lend_token_address")]
    pub lend_token_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds between balance polls
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
}

// Default value functions

fn default_wallet_address() -> String {
    "0x43112BfFEB174D3EE9117060E1F8D38F30d245A3".to_string()
}

fn default_api_url() -> String {
    "https://api.hyperliquid.xyz".to_string()
}

fn default_rpc_url() -> String {
    "https://rpc.hyperliquid.xyz/evm".to_string()
}

fn default_lend_token_address() -> String {
    "0x0D745EAA9E70bb8B6e2a0317f85F1d536616bD34".to_string()
}

fn default_poll_interval_secs() -> u64 {
    30
}

impl Default for HyperliquidConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

impl Default for EvmConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            lend_token_address: default_lend_token_address(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wallet_address: default_wallet_address(),
            hyperliquid: HyperliquidConfig::default(),
            evm: EvmConfig::default(),
            poll: PollConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from an optional `config` file and `HYPE__`-prefixed
    /// environment variables.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::default().separator("__").prefix("HYPE"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            is_evm_address(&self.wallet_address),
            "wallet_address must be a 0x-prefixed 20-byte hex address"
        );

        anyhow::ensure!(
            is_evm_address(&self.evm.lend_token_address),
            "lend_token_address must be a 0x-prefixed 20-byte hex address"
        );

        anyhow::ensure!(
            self.hyperliquid.api_url.starts_with("http"),
            "api_url must be an http(s) URL"
        );

        anyhow::ensure!(
            self.evm.rpc_url.starts_with("http"),
            "rpc_url must be an http(s) URL"
        );

        anyhow::ensure!(
            self.poll.interval_secs >= 5,
            "poll interval_secs must be at least 5"
        );

        Ok(())
    }
}

fn is_evm_address(s: &str) -> bool {
    s.len() == 42 && s.starts_with("0x") && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}
