//! JSON-RPC chain client backed by an alloy provider
//!
//! Receipt waiting polls `eth_getTransactionReceipt` until the receipt shows
//! up or the timeout elapses (120s timeout, 100ms poll by default).
//!
//! Created: 2026-10-18

use super::ChainClient;
use crate::error::{Result, TraderError};
use crate::types::TxReceipt;
use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use reqwest::Url;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

pub const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Shortest gap between two receipt polls
pub const MIN_RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// [`ChainClient`] over any alloy [`Provider`]
pub struct RpcChainClient<P> {
    provider: P,
    receipt_timeout: Duration,
    poll_interval: Duration,
}

impl RpcChainClient<RootProvider> {
    /// Plain HTTP client (no fillers: the builder sets nonce and gas itself)
    pub fn connect_http(url: Url) -> Self {
        Self::new(RootProvider::new_http(url))
    }
}

impl<P: Provider> RpcChainClient<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            receipt_timeout: DEFAULT_RECEIPT_TIMEOUT,
            poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
        }
    }

    /// Override the receipt wait horizon. The poll interval is clamped to
    /// [`MIN_RECEIPT_POLL_INTERVAL`].
    pub fn with_receipt_wait(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.receipt_timeout = timeout;
        self.poll_interval = poll_interval.max(MIN_RECEIPT_POLL_INTERVAL);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P: Provider> ChainClient for RpcChainClient<P> {
    async fn latest_block_timestamp(&self) -> Result<u64> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await
            .map_err(|e| TraderError::ChainQuery(format!("latest block: {}", e)))?
            .ok_or_else(|| TraderError::ChainQuery("latest block not returned".to_string()))?;

        Ok(block.header.timestamp)
    }

    async fn gas_price(&self) -> Result<u128> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| TraderError::ChainQuery(format!("gas price: {}", e)))
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|e| TraderError::ChainQuery(format!("transaction count of {}: {}", address, e)))
    }

    async fn call(&self, contract: Address, calldata: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default()
            .to(contract)
            .input(calldata.into());

        self.provider
            .call(tx)
            .await
            .map_err(|e| TraderError::ChainQuery(format!("eth_call to {}: {}", contract, e)))
    }

    async fn send_raw(&self, raw: Bytes) -> Result<TxHash> {
        let pending = self
            .provider
            .send_raw_transaction(&raw)
            .await
            .map_err(|e| TraderError::Submission(e.to_string()))?;

        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt> {
        let started = Instant::now();

        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| TraderError::ChainQuery(format!("receipt of {}: {}", tx_hash, e)))?;

            if let Some(receipt) = receipt {
                debug!(
                    "Receipt for {:?} after {:?} (block {:?})",
                    tx_hash,
                    started.elapsed(),
                    receipt.block_number
                );
                return Ok(TxReceipt {
                    transaction_hash: receipt.transaction_hash,
                    block_number: receipt.block_number,
                    gas_used: receipt.gas_used,
                    effective_gas_price: receipt.effective_gas_price,
                    success: receipt.status(),
                });
            }

            if started.elapsed() >= self.receipt_timeout {
                return Err(TraderError::ConfirmationTimeout {
                    tx_hash,
                    waited: started.elapsed(),
                });
            }

            trace!("No receipt yet for {:?}", tx_hash);
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
