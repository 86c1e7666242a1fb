//! Transaction Builder
//!
//! Turns a swap intent or an approval into an unsigned legacy transaction,
//! pulling fresh chain state on every build:
//! - deadline = latest block timestamp + 300s (never cached)
//! - gas price = current network gas price
//! - nonce = account transaction count
//!
//! Paths are always two hops through the exchange's wrapped native token and
//! the minimum output is always zero. There is no slippage protection here;
//! callers that need it must check quotes themselves.
//!
//! Nonces are not tracked between builds. Two builds racing on one account
//! read the same nonce; see `NonceMode` in the trader for the opt-in guard.
//!
//! Created: 2026-10-18

use crate::chain::ChainClient;
use crate::contracts::{IUniswapV2Router02, IERC20};
use crate::error::{Result, TraderError};
use crate::session::TraderSession;
use crate::types::{
    to_base_units, ExchangeConfig, QuoteRequest, SwapDirection, SwapIntent, TxPurpose,
    UnsignedTransaction,
};
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Seconds a swap stays executable after the block it was built against
pub const SWAP_DEADLINE_SECS: u64 = 300;

pub const DEFAULT_SWAP_GAS_LIMIT: u64 = 250_000;
pub const DEFAULT_APPROVE_GAS_LIMIT: u64 = 100_000;

/// Fixed gas limits (not estimated per transaction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GasLimits {
    #[serde(default = "default_swap_gas_limit")]
    pub swap: u64,
    #[serde(default = "default_approve_gas_limit")]
    pub approve: u64,
}

fn default_swap_gas_limit() -> u64 { DEFAULT_SWAP_GAS_LIMIT }
fn default_approve_gas_limit() -> u64 { DEFAULT_APPROVE_GAS_LIMIT }

impl Default for GasLimits {
    fn default() -> Self {
        Self {
            swap: DEFAULT_SWAP_GAS_LIMIT,
            approve: DEFAULT_APPROVE_GAS_LIMIT,
        }
    }
}

// ── Price queries (pure) ─────────────────────────────────────────────

/// Prepare a getAmountsOut query for `unit_amount` whole tokens -> native
pub fn build_price_query(
    exchange: &ExchangeConfig,
    token: Address,
    unit_amount: Decimal,
    token_decimals: u8,
) -> Result<QuoteRequest> {
    Ok(QuoteRequest {
        router: exchange.router,
        amount_in: to_base_units(unit_amount, token_decimals)?,
        path: vec![token, exchange.wrapped_native],
    })
}

/// getAmountsOut calldata for a prepared query
pub fn encode_price_query(query: &QuoteRequest) -> Bytes {
    IUniswapV2Router02::getAmountsOutCall {
        amountIn: query.amount_in,
        path: query.path.clone(),
    }
    .abi_encode()
    .into()
}

/// Output amount (last element) of a getAmountsOut response
pub fn decode_price_quote(data: &[u8]) -> Result<U256> {
    let amounts = IUniswapV2Router02::getAmountsOutCall::abi_decode_returns(data)
        .map_err(|e| TraderError::Decode(format!("getAmountsOut: {}", e)))?;

    if amounts.len() < 2 {
        return Err(TraderError::Decode(format!(
            "getAmountsOut returned {} amounts, expected 2",
            amounts.len()
        )));
    }

    Ok(amounts[amounts.len() - 1])
}

/// ERC20 decimals() calldata
pub fn encode_decimals_query() -> Bytes {
    IERC20::decimalsCall {}.abi_encode().into()
}

pub fn decode_decimals(data: &[u8]) -> Result<u8> {
    IERC20::decimalsCall::abi_decode_returns(data)
        .map_err(|e| TraderError::Decode(format!("decimals: {}", e)))
}

// ── Transactions (read chain state) ──────────────────────────────────

/// Builds swap and approval transactions against live chain state
pub struct TransactionBuilder<C> {
    client: Arc<C>,
    gas_limits: GasLimits,
}

impl<C: ChainClient> TransactionBuilder<C> {
    pub fn new(client: Arc<C>, gas_limits: GasLimits) -> Self {
        Self { client, gas_limits }
    }

    pub fn gas_limits(&self) -> GasLimits {
        self.gas_limits
    }

    /// Build a router swap for `intent`.
    ///
    /// The deadline comes from a block timestamp fetched here, so a stale
    /// quote cannot execute more than five minutes after this call.
    pub async fn build_swap(
        &self,
        session: &TraderSession,
        intent: &SwapIntent,
    ) -> Result<UnsignedTransaction> {
        let exchange = session.exchange();

        let block_timestamp = self.client.latest_block_timestamp().await?;
        let deadline = block_timestamp + SWAP_DEADLINE_SECS;

        let path = intent.path(exchange.wrapped_native);

        let (input, value): (Bytes, U256) = match intent.direction {
            SwapDirection::NativeToToken => (
                IUniswapV2Router02::swapExactETHForTokensCall {
                    amountOutMin: intent.min_output,
                    path: path.clone(),
                    to: intent.recipient,
                    deadline: U256::from(deadline),
                }
                .abi_encode()
                .into(),
                intent.amount,
            ),
            SwapDirection::TokenToNative => (
                IUniswapV2Router02::swapExactTokensForETHCall {
                    amountIn: intent.amount,
                    amountOutMin: intent.min_output,
                    path: path.clone(),
                    to: intent.recipient,
                    deadline: U256::from(deadline),
                }
                .abi_encode()
                .into(),
                U256::ZERO,
            ),
        };

        let (gas_price, nonce) = self.gas_price_and_nonce(session.account()).await?;

        debug!(
            "Built {} swap on {}: amount={} path={:?} deadline={} nonce={} gas_price={}",
            intent.direction, exchange.name, intent.amount, path, deadline, nonce, gas_price
        );

        Ok(UnsignedTransaction {
            from: session.account(),
            to: exchange.router,
            value,
            input,
            gas_limit: self.gas_limits.swap,
            gas_price,
            nonce,
            chain_id: session.chain_id(),
            purpose: TxPurpose::Swap {
                direction: intent.direction,
                path,
                amount_out_min: intent.min_output,
                deadline,
            },
        })
    }

    /// Build an unlimited approve(router, 2^256-1) on `token`
    pub async fn build_approval(
        &self,
        session: &TraderSession,
        token: Address,
    ) -> Result<UnsignedTransaction> {
        let spender = session.exchange().router;
        let amount = U256::MAX;

        let input: Bytes = IERC20::approveCall { spender, amount }.abi_encode().into();

        let (gas_price, nonce) = self.gas_price_and_nonce(session.account()).await?;

        debug!(
            "Built approval of {} for router {}: nonce={} gas_price={}",
            token, spender, nonce, gas_price
        );

        Ok(UnsignedTransaction {
            from: session.account(),
            to: token,
            value: U256::ZERO,
            input,
            gas_limit: self.gas_limits.approve,
            gas_price,
            nonce,
            chain_id: session.chain_id(),
            purpose: TxPurpose::Approval {
                token,
                spender,
                amount,
            },
        })
    }

    async fn gas_price_and_nonce(&self, account: Address) -> Result<(u128, u64)> {
        let gas_price = self.client.gas_price().await?;
        let nonce = self.client.transaction_count(account).await?;
        Ok((gas_price, nonce))
    }
}
