//! Meme Coin Trader Library
//!
//! Swap client for Uniswap V2-style routers on EVM chains (Ethereum, BSC):
//! price quotes, native<->token swaps and router approvals, signed locally
//! and submitted over JSON-RPC.
//!
//! Created: 2026-10-18

pub mod builder;
pub mod chain;
pub mod config;
pub mod contracts;
pub mod error;
pub mod registry;
pub mod session;
pub mod signer;
pub mod trader;
pub mod types;

// Re-export commonly used types
pub use builder::{GasLimits, TransactionBuilder};
pub use chain::{ChainClient, RpcChainClient};
pub use config::{load_config, load_config_from_file, TraderConfig, TraderSettings};
pub use error::{Result, TraderError};
pub use registry::DexRegistry;
pub use session::TraderSession;
pub use trader::{MemeCoinTrader, NonceMode};
pub use types::{ExchangeConfig, Network, SwapDirection, SwapIntent, TxReceipt};
