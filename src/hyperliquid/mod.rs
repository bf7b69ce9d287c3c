//! Hyperliquid info-endpoint integration.
//!
//! Read-only access to per-user Hyperliquid state:
//! - Spot clearinghouse balances (token holdings)
//! - Perps clearinghouse state (margin account equity)
//! - Mid prices for all assets
//!
//! All numbers come over the wire as decimal strings; response types keep
//! them as strings so a malformed entry for an unrelated asset cannot fail
//! the whole fetch. Callers parse only the entries they select.

mod client;
mod types;

pub use client::HyperliquidClient;
pub use types::*;
