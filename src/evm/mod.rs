//! HyperEVM JSON-RPC integration.
//!
//! Read-only access to on-chain balances:
//! - ERC-20 `balanceOf` via `eth_call` (HyperLend wHYPE deposits)
//! - Native HYPE balance via `eth_getBalance`
//!
//! Both return big-endian hex quantities in the chain's 18-decimal
//! fixed-point representation; decoding goes through a 256-bit integer
//! before the final floating-point division.

mod client;
mod types;

pub use client::{encode_balance_of, wei_to_units, EvmClient};
pub use types::{RpcError, RpcErrorObject, RpcRequest, RpcResponse};
