//! # HYPE Portfolio
//!
//! Balance aggregation for a single HYPE wallet across four sources:
//! Hyperliquid spot, the perps clearinghouse, a HyperLend deposit and the
//! HyperEVM native balance.
//!
//! ## Architecture
//!
//! - `config`: Configuration management and validation
//! - `hyperliquid`: Hyperliquid info-endpoint client (spot, perps, mids)
//! - `evm`: HyperEVM JSON-RPC client (`eth_call` / `eth_getBalance`)
//! - `portfolio`: Balance aggregation into a single breakdown snapshot
//! - `utils`: Shared numeric utilities

pub mod config;
pub mod evm;
pub mod hyperliquid;
pub mod portfolio;
pub mod utils;

pub use config::Config;
pub use portfolio::{BalanceAggregator, BalanceBreakdown};
