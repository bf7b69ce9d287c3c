//! Type definitions for Hyperliquid info-endpoint requests and responses.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request type for the Hyperliquid info endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum InfoRequest {
    /// Get spot token balances for a user.
    #[serde(rename = "spotClearinghouseState")]
    SpotClearinghouseState { user: String },

    /// Get perps clearinghouse state (margin summary) for a user.
    #[serde(rename = "clearinghouseState")]
    ClearinghouseState { user: String },

    /// Get all mid prices.
    #[serde(rename = "allMids")]
    AllMids,
}

/// Response from the `spotClearinghouseState` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotClearinghouseState {
    #[serde(default)]
    pub balances: Vec<SpotBalance>,
}

/// A single spot token balance entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotBalance {
    /// Token symbol (e.g., "HYPE", "USDC")
    pub coin: String,
    /// Total balance as a decimal string
    pub total: String,
    /// Amount on hold for open orders
    #[serde(default)]
    pub hold: String,
}

/// Response from the `clearinghouseState` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearinghouseState {
    pub margin_summary: MarginSummary,
}

/// Margin summary for a perps account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginSummary {
    /// Account equity in USD; negative when the account owes more than
    /// its collateral.
    pub account_value: String,
}

/// Response from the `allMids` endpoint: ticker -> decimal-string mid price.
pub type AllMids = HashMap<String, String>;
