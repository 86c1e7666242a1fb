//! Chain Client Adapter
//!
//! The only seam between the trader and a node. Every value the builder needs
//! from the chain (block timestamp, gas price, nonce) and every submission goes
//! through [`ChainClient`]. Tests swap in a scripted stub.

mod rpc;

#[cfg(test)]
pub(crate) mod stub;

pub use rpc::{RpcChainClient, DEFAULT_RECEIPT_POLL_INTERVAL, DEFAULT_RECEIPT_TIMEOUT};

use crate::error::Result;
use crate::types::TxReceipt;
use alloy::primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;

/// Blockchain capabilities consumed by the trader.
///
/// Implementations map their own failures onto the trader taxonomy:
/// reads fail with `ChainQuery`, a rejected raw transaction with
/// `Submission`, an expired receipt wait with `ConfirmationTimeout`.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Timestamp (seconds) of the latest block
    async fn latest_block_timestamp(&self) -> Result<u64>;

    /// Current network gas price in wei
    async fn gas_price(&self) -> Result<u128>;

    /// Transaction count of `address` (its next nonce)
    async fn transaction_count(&self, address: Address) -> Result<u64>;

    /// Read-only eth_call against `contract`
    async fn call(&self, contract: Address, calldata: Bytes) -> Result<Bytes>;

    /// Submit signed EIP-2718 bytes, returning the transaction hash
    async fn send_raw(&self, raw: Bytes) -> Result<TxHash>;

    /// Wait until `tx_hash` is mined and return its receipt
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt>;
}
