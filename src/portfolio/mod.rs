//! Balance aggregation across the four HYPE sources.
//!
//! The aggregator fans out to five independent fetches (spot, perps margin,
//! HyperLend deposit, native EVM balance, mid prices), waits for all of
//! them, and combines the results into one [`BalanceBreakdown`]. Every
//! fetcher swallows its own failures and degrades to zero, so a single
//! degraded upstream lowers the totals instead of blanking the dashboard;
//! [`BalanceAggregator::get_full_balance`] itself has no failure path.

use serde::Serialize;
use tracing::warn;

use crate::config::Config;
use crate::evm::EvmClient;
use crate::hyperliquid::HyperliquidClient;
use crate::utils::num::{parse_units, safe_div};

/// Ticker of the tracked asset.
const HYPE_TICKER: &str = "HYPE";

/// Ticker of the reference asset for the secondary valuation unit.
const BTC_TICKER: &str = "BTC";

/// One wallet's full balance picture, recomputed from scratch on every poll.
///
/// `total_hype` is the sum of the three HYPE-denominated holdings; the perps
/// account is already USD-denominated and only enters `total_usd`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceBreakdown {
    pub spot_hype: f64,
    pub hyper_lend_hype: f64,
    pub evm_native_hype: f64,
    pub perp_value_usd: f64,
    pub total_hype: f64,
    pub total_usd: f64,
    pub total_btc: f64,
    pub hype_price: f64,
    pub btc_price: f64,
}

/// Mid prices for the tracked and reference assets, fetched in one call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prices {
    pub hype: f64,
    pub btc: f64,
}

/// Aggregates one wallet's balances from the info API and the EVM RPC.
#[derive(Debug, Clone)]
pub struct BalanceAggregator {
    info: HyperliquidClient,
    evm: EvmClient,
    wallet_address: String,
    lend_token_address: String,
}

impl BalanceAggregator {
    /// Create an aggregator from explicit clients and addresses.
    pub fn new(
        info: HyperliquidClient,
        evm: EvmClient,
        wallet_address: &str,
        lend_token_address: &str,
    ) -> Self {
        Self {
            info,
            evm,
            wallet_address: wallet_address.to_string(),
            lend_token_address: lend_token_address.to_string(),
        }
    }

    /// Create an aggregator wired to the endpoints in `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            HyperliquidClient::with_base_url(&config.hyperliquid.api_url)?,
            EvmClient::with_url(&config.evm.rpc_url)?,
            &config.wallet_address,
            &config.evm.lend_token_address,
        ))
    }

    /// HYPE held directly in the spot clearinghouse.
    pub async fn spot_hype(&self, address: &str) -> f64 {
        match self.info.spot_clearinghouse_state(address).await {
            Ok(state) => state
                .balances
                .iter()
                .find(|b| b.coin == HYPE_TICKER)
                .map(|b| parse_units(&b.total))
                .unwrap_or(0.0),
            Err(e) => {
                warn!(error = %e, "spot HYPE fetch failed, defaulting to 0");
                0.0
            }
        }
    }

    /// Perps margin account equity in USD. May be negative; not clamped.
    pub async fn perp_account_value(&self, address: &str) -> f64 {
        match self.info.clearinghouse_state(address).await {
            Ok(state) => parse_units(&state.margin_summary.account_value),
            Err(e) => {
                warn!(error = %e, "perp account value fetch failed, defaulting to 0");
                0.0
            }
        }
    }

    /// HYPE deposited into HyperLend, read as a wHYPE token balance.
    pub async fn hyper_lend_hype(&self, address: &str) -> f64 {
        match self
            .evm
            .erc20_balance(&self.lend_token_address, address)
            .await
        {
            Ok(balance) => balance,
            Err(e) => {
                warn!(error = %e, "HyperLend balance fetch failed, defaulting to 0");
                0.0
            }
        }
    }

    /// Native HYPE balance on the EVM side.
    pub async fn evm_native_hype(&self, address: &str) -> f64 {
        match self.evm.native_balance(address).await {
            Ok(balance) => balance,
            Err(e) => {
                warn!(error = %e, "EVM native balance fetch failed, defaulting to 0");
                0.0
            }
        }
    }

    /// Current HYPE and BTC mid prices.
    pub async fn mid_prices(&self) -> Prices {
        match self.info.all_mids().await {
            Ok(mids) => Prices {
                hype: mids.get(HYPE_TICKER).map(|p| parse_units(p)).unwrap_or(0.0),
                btc: mids.get(BTC_TICKER).map(|p| parse_units(p)).unwrap_or(0.0),
            },
            Err(e) => {
                warn!(error = %e, "mid price fetch failed, defaulting to 0");
                Prices {
                    hype: 0.0,
                    btc: 0.0,
                }
            }
        }
    }

    /// Fetch all five sources concurrently and combine them.
    ///
    /// Full barrier: waits for every fetch to settle. Infallible by
    /// construction, since each fetcher already degrades to zero.
    pub async fn get_full_balance(&self, address: Option<&str>) -> BalanceBreakdown {
        let address = address.unwrap_or(&self.wallet_address);

        let (spot_hype, perp_value_usd, hyper_lend_hype, evm_native_hype, prices) = tokio::join!(
            self.spot_hype(address),
            self.perp_account_value(address),
            self.hyper_lend_hype(address),
            self.evm_native_hype(address),
            self.mid_prices(),
        );

        let total_hype = spot_hype + hyper_lend_hype + evm_native_hype;
        let total_usd = total_hype * prices.hype + perp_value_usd;
        let total_btc = safe_div(total_usd, prices.btc);

        BalanceBreakdown {
            spot_hype,
            hyper_lend_hype,
            evm_native_hype,
            perp_value_usd,
            total_hype,
            total_usd,
            total_btc,
            hype_price: prices.hype,
            btc_price: prices.btc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn aggregator_against(info: &MockServer, evm: &MockServer) -> BalanceAggregator {
        BalanceAggregator::new(
            HyperliquidClient::with_base_url(&info.uri()).unwrap(),
            EvmClient::with_url(&evm.uri()).unwrap(),
            "0x43112BfFEB174D3EE9117060E1F8D38F30d245A3",
            "0x0D745EAA9E70bb8B6e2a0317f85F1d536616bD34",
        )
    }

    fn mock_info(body_type: &str, response: serde_json::Value) -> Mock {
        Mock::given(method("POST"))
            .and(path("/info"))
            .and(body_partial_json(json!({"type": body_type})))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
    }

    fn mock_rpc(rpc_method: &str, result_hex: &str) -> Mock {
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_partial_json(json!({"method": rpc_method})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": 1, "result": result_hex
            })))
    }

    #[tokio::test]
    async fn test_full_balance_end_to_end() {
        let info = MockServer::start().await;
        let evm = MockServer::start().await;

        mock_info(
            "spotClearinghouseState",
            json!({"balances": [
                {"coin": "USDC", "total": "1.0", "hold": "0.0"},
                {"coin": "HYPE", "total": "10.5", "hold": "0.0"}
            ]}),
        )
        .mount(&info)
        .await;
        mock_info(
            "clearinghouseState",
            json!({"marginSummary": {"accountValue": "-2.3"}}),
        )
        .mount(&info)
        .await;
        mock_info("allMids", json!({"HYPE": "30", "BTC": "90000"}))
            .mount(&info)
            .await;
        // 5.0 tokens and 0.25 HYPE at 18 decimals
        mock_rpc("eth_call", "0x4563918244f40000").mount(&evm).await;
        mock_rpc("eth_getBalance", "0x3782dace9d90000")
            .mount(&evm)
            .await;

        let breakdown = aggregator_against(&info, &evm)
            .await
            .get_full_balance(None)
            .await;

        assert_eq!(breakdown.spot_hype, 10.5);
        assert_eq!(breakdown.hyper_lend_hype, 5.0);
        assert_eq!(breakdown.evm_native_hype, 0.25);
        assert_eq!(breakdown.perp_value_usd, -2.3);
        assert_eq!(breakdown.total_hype, 15.75);
        assert_eq!(breakdown.total_usd, 15.75 * 30.0 + -2.3);
        assert!((breakdown.total_usd - 470.2).abs() < 1e-9);
        assert!((breakdown.total_btc - 0.005224).abs() < 1e-6);
        assert_eq!(breakdown.hype_price, 30.0);
        assert_eq!(breakdown.btc_price, 90000.0);
    }

    #[tokio::test]
    async fn test_total_hype_is_exact_sum() {
        let info = MockServer::start().await;
        let evm = MockServer::start().await;

        mock_info(
            "spotClearinghouseState",
            json!({"balances": [{"coin": "HYPE", "total": "0.1", "hold": "0.0"}]}),
        )
        .mount(&info)
        .await;
        mock_info(
            "clearinghouseState",
            json!({"marginSummary": {"accountValue": "0"}}),
        )
        .mount(&info)
        .await;
        mock_info("allMids", json!({})).mount(&info).await;
        mock_rpc("eth_call", "0x0").mount(&evm).await;
        mock_rpc("eth_getBalance", "0xde0b6b3a7640000")
            .mount(&evm)
            .await;

        let breakdown = aggregator_against(&info, &evm)
            .await
            .get_full_balance(None)
            .await;

        assert_eq!(
            breakdown.total_hype,
            breakdown.spot_hype + breakdown.hyper_lend_hype + breakdown.evm_native_hype
        );
        // BTC price absent from mids: no division-by-zero propagation
        assert_eq!(breakdown.btc_price, 0.0);
        assert_eq!(breakdown.total_btc, 0.0);
    }

    #[tokio::test]
    async fn test_missing_hype_entry_defaults_to_zero() {
        let info = MockServer::start().await;
        let evm = MockServer::start().await;

        mock_info(
            "spotClearinghouseState",
            json!({"balances": [{"coin": "USDC", "total": "99.0", "hold": "0.0"}]}),
        )
        .mount(&info)
        .await;

        let aggregator = aggregator_against(&info, &evm).await;
        assert_eq!(aggregator.spot_hype("0xabc").await, 0.0);
    }

    #[tokio::test]
    async fn test_unparseable_total_is_coerced_to_zero() {
        let info = MockServer::start().await;
        let evm = MockServer::start().await;

        mock_info(
            "spotClearinghouseState",
            json!({"balances": [{"coin": "HYPE", "total": "NaN", "hold": "0.0"}]}),
        )
        .mount(&info)
        .await;

        let aggregator = aggregator_against(&info, &evm).await;
        // must not poison total_hype with NaN
        assert_eq!(aggregator.spot_hype("0xabc").await, 0.0);
    }

    #[tokio::test]
    async fn test_every_fetcher_degrades_on_http_error() {
        let info = MockServer::start().await;
        let evm = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&info)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&evm)
            .await;

        let aggregator = aggregator_against(&info, &evm).await;
        let breakdown = aggregator.get_full_balance(None).await;

        assert_eq!(breakdown.total_hype, 0.0);
        assert_eq!(breakdown.total_usd, 0.0);
        assert_eq!(breakdown.total_btc, 0.0);
    }

    #[tokio::test]
    async fn test_every_fetcher_degrades_on_transport_failure() {
        // Servers dropped before the fetch: connection refused
        let (info_uri, evm_uri) = {
            let info = MockServer::start().await;
            let evm = MockServer::start().await;
            (info.uri(), evm.uri())
        };

        let aggregator = BalanceAggregator::new(
            HyperliquidClient::with_base_url(&info_uri).unwrap(),
            EvmClient::with_url(&evm_uri).unwrap(),
            "0xabc",
            "0xdef",
        );
        let breakdown = aggregator.get_full_balance(None).await;

        assert_eq!(breakdown.spot_hype, 0.0);
        assert_eq!(breakdown.perp_value_usd, 0.0);
        assert_eq!(breakdown.hyper_lend_hype, 0.0);
        assert_eq!(breakdown.evm_native_hype, 0.0);
        assert_eq!(breakdown.hype_price, 0.0);
    }

    #[tokio::test]
    async fn test_malformed_bodies_degrade_to_zero() {
        let info = MockServer::start().await;
        let evm = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&info)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&evm)
            .await;

        let aggregator = aggregator_against(&info, &evm).await;
        let breakdown = aggregator.get_full_balance(None).await;
        assert_eq!(breakdown.total_usd, 0.0);
    }

    #[tokio::test]
    async fn test_rpc_error_object_degrades_to_zero() {
        let info = MockServer::start().await;
        let evm = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": 1,
                "error": {"code": -32000, "message": "out of gas"}
            })))
            .mount(&evm)
            .await;

        let aggregator = aggregator_against(&info, &evm).await;
        assert_eq!(aggregator.hyper_lend_hype("0xabc").await, 0.0);
        assert_eq!(aggregator.evm_native_hype("0xabc").await, 0.0);
    }

    #[test]
    fn test_breakdown_serializes_camel_case() {
        let breakdown = BalanceBreakdown {
            spot_hype: 10.5,
            hyper_lend_hype: 5.0,
            evm_native_hype: 0.25,
            perp_value_usd: -2.3,
            total_hype: 15.75,
            total_usd: 470.2,
            total_btc: 0.005224,
            hype_price: 30.0,
            btc_price: 90000.0,
        };

        let value = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(value["spotHype"], 10.5);
        assert_eq!(value["hyperLendHype"], 5.0);
        assert_eq!(value["evmNativeHype"], 0.25);
        assert_eq!(value["perpValueUsd"], -2.3);
        assert_eq!(value["totalHype"], 15.75);
        assert_eq!(value["hypePrice"], 30.0);
        assert_eq!(value["btcPrice"], 90000.0);
    }
}
