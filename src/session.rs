//! Trader session
//!
//! One (network, DEX, account) triple for the lifetime of a trader. The
//! signing key lives only here, inside alloy's `PrivateKeySigner`:
//! - never serialized
//! - never logged (Debug is redacted)
//! - only reachable through the signer module

use crate::error::{Result, TraderError};
use crate::types::{ExchangeConfig, Network};
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

pub struct TraderSession {
    network: Network,
    exchange: ExchangeConfig,
    signer: PrivateKeySigner,
    /// Derived from the signer, safe to expose
    account: Address,
}

impl TraderSession {
    pub fn new(network: Network, exchange: ExchangeConfig, signer: PrivateKeySigner) -> Self {
        let account = signer.address();
        Self {
            network,
            exchange,
            signer,
            account,
        }
    }

    /// Create a session from a hex-encoded private key (0x prefix optional)
    pub fn from_private_key(
        network: Network,
        exchange: ExchangeConfig,
        key_hex: &str,
    ) -> Result<Self> {
        let key_hex = key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        // The parse error never contains key material
        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| TraderError::Config(format!("Invalid private key: {}", e)))?;

        Ok(Self::new(network, exchange, signer))
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn chain_id(&self) -> u64 {
        self.network.chain_id()
    }

    pub fn exchange(&self) -> &ExchangeConfig {
        &self.exchange
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub(crate) fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

impl std::fmt::Debug for TraderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraderSession")
            .field("network", &self.network)
            .field("exchange", &self.exchange.id)
            .field("account", &self.account)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}
