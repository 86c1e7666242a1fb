//! Trading Facade
//!
//! Public operations for one (network, DEX, account) session:
//! - get_price: getAmountsOut quote, soft-fails to None for batch scanning
//! - buy: native -> token via swapExactETHForTokens
//! - sell: token -> native via swapExactTokensForETH
//! - approve: unlimited router allowance on a token
//!
//! SELL PRECONDITION: the router must already hold an allowance of at least
//! the sell amount. Nothing here checks it; call `approve` first.
//!
//! Nonce handling is selected by [`NonceMode`]. The default reads the nonce
//! independently per call, so concurrent calls on one account can collide.
//! `Serialized` holds a per-trader lock from nonce read through receipt.
//!
//! Created: 2026-10-18

use crate::builder::{
    build_price_query, decode_decimals, decode_price_quote, encode_decimals_query,
    encode_price_query, GasLimits, TransactionBuilder,
};
use crate::chain::{ChainClient, RpcChainClient};
use crate::config::TraderConfig;
use crate::error::Result;
use crate::registry::DexRegistry;
use crate::session::TraderSession;
use crate::signer::sign_and_send;
use crate::types::{format_native, parse_address, to_base_units, SwapIntent, TxReceipt, NATIVE_DECIMALS};
use alloy::primitives::U256;
use alloy::providers::RootProvider;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// How nonce acquisition is coordinated between concurrent calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonceMode {
    /// Each call reads the account nonce on its own. Concurrent calls can
    /// fetch the same nonce and one of them will be rejected by the node.
    #[default]
    Unserialized,
    /// Build + sign + send + wait run one at a time per trader, so every
    /// call sees the nonce left by the previous one.
    Serialized,
}

/// Swap client for a single configured session
pub struct MemeCoinTrader<C> {
    session: TraderSession,
    client: Arc<C>,
    builder: TransactionBuilder<C>,
    nonce_mode: NonceMode,
    submission_lock: Mutex<()>,
}

impl<C: ChainClient> MemeCoinTrader<C> {
    pub fn new(session: TraderSession, client: Arc<C>, gas_limits: GasLimits, nonce_mode: NonceMode) -> Self {
        info!(
            "Trader ready: {} on {} (router {}, wrapped native {}) | account {}",
            session.exchange().name,
            session.network(),
            session.exchange().router_checksummed(),
            session.exchange().wrapped_native_checksummed(),
            session.account()
        );
        if nonce_mode == NonceMode::Unserialized {
            info!("Nonce mode: unserialized (concurrent calls on this account may reuse a nonce)");
        } else {
            info!("Nonce mode: serialized");
        }

        Self {
            builder: TransactionBuilder::new(client.clone(), gas_limits),
            session,
            client,
            nonce_mode,
            submission_lock: Mutex::new(()),
        }
    }

    pub fn session(&self) -> &TraderSession {
        &self.session
    }

    pub fn nonce_mode(&self) -> NonceMode {
        self.nonce_mode
    }

    /// Price of one whole token in native currency, or None on any failure
    pub async fn get_price(&self, token: &str) -> Option<Decimal> {
        self.get_price_for(token, Decimal::ONE).await
    }

    /// Native currency received for `amount` whole tokens, or None on any
    /// failure (logged, never raised)
    pub async fn get_price_for(&self, token: &str, amount: Decimal) -> Option<Decimal> {
        match self.quote(token, amount).await {
            Ok(price) => Some(price),
            Err(e) => {
                warn!("Error getting price for {}: {}", token.trim(), e);
                None
            }
        }
    }

    /// Typed quote; `get_price_for` turns errors into None
    pub async fn quote(&self, token: &str, amount: Decimal) -> Result<Decimal> {
        let token = parse_address(token)?;
        let exchange = self.session.exchange();

        let decimals = decode_decimals(
            &self.client.call(token, encode_decimals_query()).await?,
        )?;

        let query = build_price_query(exchange, token, amount, decimals)?;
        let response = self
            .client
            .call(query.router, encode_price_query(&query))
            .await?;

        format_native(decode_price_quote(&response)?)
    }

    /// Buy `token` with `native_amount` of the chain's native currency
    pub async fn buy(&self, token: &str, native_amount: Decimal) -> Result<TxReceipt> {
        let token = parse_address(token)?;
        let value = to_base_units(native_amount, NATIVE_DECIMALS)?;

        info!(
            "Buy: {} {} -> {} on {}",
            native_amount,
            self.session.network().native_symbol(),
            token,
            self.session.exchange().name
        );

        let intent = SwapIntent::buy(token, value, self.session.account());
        self.swap(intent).await
    }

    /// Sell `token_amount` base units of `token` for native currency.
    ///
    /// Requires a prior `approve(token)`; not checked here.
    pub async fn sell(&self, token: &str, token_amount: U256) -> Result<TxReceipt> {
        let token = parse_address(token)?;

        info!(
            "Sell: {} of {} -> {} on {}",
            token_amount,
            token,
            self.session.network().native_symbol(),
            self.session.exchange().name
        );

        let intent = SwapIntent::sell(token, token_amount, self.session.account());
        self.swap(intent).await
    }

    /// Give the router an unlimited allowance on `token`
    pub async fn approve(&self, token: &str) -> Result<TxReceipt> {
        let token = parse_address(token)?;
        info!("Approve: {} for {} router", token, self.session.exchange().name);

        let _guard = self.serialize().await;
        let tx = self.builder.build_approval(&self.session, token).await?;
        let receipt = sign_and_send(self.client.as_ref(), &self.session, &tx).await?;
        Self::warn_if_reverted(&receipt, "Approval");
        Ok(receipt)
    }

    async fn swap(&self, intent: SwapIntent) -> Result<TxReceipt> {
        let _guard = self.serialize().await;
        let tx = self.builder.build_swap(&self.session, &intent).await?;
        let receipt = sign_and_send(self.client.as_ref(), &self.session, &tx).await?;
        Self::warn_if_reverted(&receipt, "Swap");
        Ok(receipt)
    }

    /// Lock held from nonce read to receipt in serialized mode
    async fn serialize(&self) -> Option<tokio::sync::MutexGuard<'_, ()>> {
        match self.nonce_mode {
            NonceMode::Serialized => Some(self.submission_lock.lock().await),
            NonceMode::Unserialized => None,
        }
    }

    fn warn_if_reverted(receipt: &TxReceipt, what: &str) {
        if !receipt.success {
            warn!("{} {:?} reverted on-chain", what, receipt.transaction_hash);
        }
    }
}

impl<C: ChainClient> std::fmt::Debug for MemeCoinTrader<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemeCoinTrader")
            .field("session", &self.session)
            .field("gas_limits", &self.builder.gas_limits())
            .field("nonce_mode", &self.nonce_mode)
            .finish_non_exhaustive()
    }
}

impl MemeCoinTrader<RpcChainClient<RootProvider>> {
    /// Construct a trader over HTTP from loaded configuration.
    ///
    /// Fails before any network traffic on an unknown DEX id or a bad key.
    pub fn from_config(config: &TraderConfig, registry: &DexRegistry) -> Result<Self> {
        let exchange = registry.lookup(&config.dex)?.clone();
        let session =
            TraderSession::from_private_key(config.network, exchange, config.private_key())?;

        let receipt = &config.settings.receipt;
        let client = RpcChainClient::connect_http(config.rpc_url.clone())
            .with_receipt_wait(receipt.timeout(), receipt.poll_interval());

        Ok(Self::new(
            session,
            Arc::new(client),
            config.settings.gas,
            config.settings.nonce.mode,
        ))
    }
}
