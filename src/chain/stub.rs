//! Scripted in-memory chain client for tests

use super::ChainClient;
use crate::error::{Result, TraderError};
use crate::types::TxReceipt;
use alloy::primitives::{keccak256, Address, Bytes, TxHash};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct StubState {
    timestamp: u64,
    gas_price: u128,
    base_nonce: u64,
    /// When set, every accepted submission bumps the reported nonce
    nonce_follows_sends: bool,
    call_responses: HashMap<Address, Bytes>,
    sent: Vec<Bytes>,
    calls: Vec<(Address, Bytes)>,
    fail_reads: bool,
    reject_sends: Option<String>,
    receipt_timeout: bool,
    revert_receipts: bool,
}

/// Chain client returning fixed values and recording what was sent
#[derive(Debug, Default)]
pub struct StubChainClient {
    state: Mutex<StubState>,
}

impl StubChainClient {
    pub fn new(nonce: u64, gas_price: u128, timestamp: u64) -> Self {
        let client = Self::default();
        {
            let mut state = client.state.lock().unwrap();
            state.base_nonce = nonce;
            state.gas_price = gas_price;
            state.timestamp = timestamp;
        }
        client
    }

    pub fn set_timestamp(&self, timestamp: u64) {
        self.state.lock().unwrap().timestamp = timestamp;
    }

    pub fn nonce_follows_sends(self) -> Self {
        self.state.lock().unwrap().nonce_follows_sends = true;
        self
    }

    pub fn respond_to_call(&self, contract: Address, response: impl Into<Bytes>) {
        self.state
            .lock()
            .unwrap()
            .call_responses
            .insert(contract, response.into());
    }

    pub fn fail_reads(&self) {
        self.state.lock().unwrap().fail_reads = true;
    }

    pub fn reject_sends(&self, reason: &str) {
        self.state.lock().unwrap().reject_sends = Some(reason.to_string());
    }

    pub fn time_out_receipts(&self) {
        self.state.lock().unwrap().receipt_timeout = true;
    }

    pub fn revert_receipts(&self) {
        self.state.lock().unwrap().revert_receipts = true;
    }

    pub fn sent(&self) -> Vec<Bytes> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn calls(&self) -> Vec<(Address, Bytes)> {
        self.state.lock().unwrap().calls.clone()
    }

    fn read<T>(&self, f: impl FnOnce(&StubState) -> T) -> Result<T> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(TraderError::ChainQuery("stub: node unavailable".to_string()));
        }
        Ok(f(&state))
    }
}

#[async_trait]
impl ChainClient for StubChainClient {
    async fn latest_block_timestamp(&self) -> Result<u64> {
        self.read(|s| s.timestamp)
    }

    async fn gas_price(&self) -> Result<u128> {
        self.read(|s| s.gas_price)
    }

    async fn transaction_count(&self, _address: Address) -> Result<u64> {
        let nonce = self.read(|s| {
            if s.nonce_follows_sends {
                s.base_nonce + s.sent.len() as u64
            } else {
                s.base_nonce
            }
        })?;
        // Let a concurrent caller run between reading the nonce and sending
        tokio::task::yield_now().await;
        Ok(nonce)
    }

    async fn call(&self, contract: Address, calldata: Bytes) -> Result<Bytes> {
        let mut state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(TraderError::ChainQuery("stub: node unavailable".to_string()));
        }
        state.calls.push((contract, calldata));
        state
            .call_responses
            .get(&contract)
            .cloned()
            .ok_or_else(|| TraderError::ChainQuery(format!("stub: execution reverted at {}", contract)))
    }

    async fn send_raw(&self, raw: Bytes) -> Result<TxHash> {
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = &state.reject_sends {
            return Err(TraderError::Submission(reason.clone()));
        }
        let hash = keccak256(&raw);
        state.sent.push(raw);
        Ok(hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<TxReceipt> {
        let state = self.state.lock().unwrap();
        if state.receipt_timeout {
            return Err(TraderError::ConfirmationTimeout {
                tx_hash,
                waited: std::time::Duration::from_secs(120),
            });
        }
        Ok(TxReceipt {
            transaction_hash: tx_hash,
            block_number: Some(1_000 + state.sent.len() as u64),
            gas_used: 21_000,
            effective_gas_price: state.gas_price,
            success: !state.revert_receipts,
        })
    }
}
