//! Error types for the meme coin trader
//!
//! Construction-time failures (unsupported DEX/network, bad config) abort
//! client creation. Per-call failures on buy/sell/approve propagate to the
//! caller unmodified; nothing is retried.

use alloy::primitives::TxHash;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraderError {
    #[error("Unsupported DEX: {id} (supported: {supported})")]
    UnsupportedDex { id: String, supported: String },

    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("Invalid address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: String },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Chain query failed: {0}")]
    ChainQuery(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Transaction rejected by node: {0}")]
    Submission(String),

    #[error("No receipt for {tx_hash} after {waited:?}")]
    ConfirmationTimeout { tx_hash: TxHash, waited: Duration },

    #[error("Failed to decode contract response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TraderError>;
