//! Hyperliquid REST API client.
//!
//! Thin wrapper over the info endpoint: every query is an HTTP POST with a
//! `type`-discriminated JSON body, and the response shape varies by type.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use super::types::*;

/// Base URL for the Hyperliquid mainnet API.
const MAINNET_API_URL: &str = "https://api.hyperliquid.xyz";

/// Hyperliquid API client for fetching per-user state and prices.
#[derive(Debug, Clone)]
pub struct HyperliquidClient {
    client: Client,
    base_url: String,
}

impl HyperliquidClient {
    /// Create a new Hyperliquid client for mainnet.
    pub fn new() -> Result<Self> {
        Self::with_base_url(MAINNET_API_URL)
    }

    /// Create a new Hyperliquid client with a custom base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST a request to the info endpoint and parse the typed response.
    async fn post_info<T: DeserializeOwned>(&self, request: &InfoRequest) -> Result<T> {
        let url = format!("{}/info", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .context("Failed to send info request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Hyperliquid API error {}: {}", status, body);
        }

        response
            .json::<T>()
            .await
            .context("Failed to parse info response")
    }

    /// Get spot token balances for a user.
    #[instrument(skip(self), name = "hl_spot_clearinghouse_state")]
    pub async fn spot_clearinghouse_state(&self, user: &str) -> Result<SpotClearinghouseState> {
        let state: SpotClearinghouseState = self
            .post_info(&InfoRequest::SpotClearinghouseState {
                user: user.to_string(),
            })
            .await?;

        debug!("Fetched {} spot balance entries", state.balances.len());
        Ok(state)
    }

    /// Get perps clearinghouse state (margin summary) for a user.
    #[instrument(skip(self), name = "hl_clearinghouse_state")]
    pub async fn clearinghouse_state(&self, user: &str) -> Result<ClearinghouseState> {
        self.post_info(&InfoRequest::ClearinghouseState {
            user: user.to_string(),
        })
        .await
    }

    /// Get mid prices for all assets, keyed by ticker.
    #[instrument(skip(self), name = "hl_all_mids")]
    pub async fn all_mids(&self) -> Result<AllMids> {
        let mids: AllMids = self.post_info(&InfoRequest::AllMids).await?;

        debug!("Fetched {} mid prices", mids.len());
        Ok(mids)
    }
}
