//! Core data structures
//!
//! Networks, exchange configuration, swap intents and the transaction
//! pipeline values: SwapIntent -> UnsignedTransaction -> SignedTransaction
//! -> TxReceipt. Each call builds its own values; nothing is cached.
//!
//! Created: 2026-10-18

use crate::error::{Result, TraderError};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimals of the native currency on every supported network (ETH, BNB)
pub const NATIVE_DECIMALS: u8 = 18;

/// Networks we can trade on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Ethereum,
    Bsc,
}

impl Network {
    /// EIP-155 chain id used when signing
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Ethereum => 1,
            Network::Bsc => 56,
        }
    }

    /// Environment variable holding the RPC endpoint for this network
    pub fn rpc_env_var(&self) -> &'static str {
        match self {
            Network::Ethereum => "INFURA_URL",
            Network::Bsc => "BSC_NODE_URL",
        }
    }

    pub fn native_symbol(&self) -> &'static str {
        match self {
            Network::Ethereum => "ETH",
            Network::Bsc => "BNB",
        }
    }
}

impl FromStr for Network {
    type Err = TraderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ethereum" | "eth" | "mainnet" => Ok(Network::Ethereum),
            "bsc" | "bnb" => Ok(Network::Bsc),
            other => Err(TraderError::UnsupportedNetwork(other.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Network::Ethereum => write!(f, "ethereum"),
            Network::Bsc => write!(f, "bsc"),
        }
    }
}

/// Addresses and display name of one DEX router deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeConfig {
    pub id: String,
    pub router: Address,
    /// Wrapped native token (WETH, WBNB) used as the other end of every path
    pub wrapped_native: Address,
    pub name: String,
}

impl ExchangeConfig {
    /// EIP-55 checksummed router address
    pub fn router_checksummed(&self) -> String {
        self.router.to_checksum(None)
    }

    /// EIP-55 checksummed wrapped native address
    pub fn wrapped_native_checksummed(&self) -> String {
        self.wrapped_native.to_checksum(None)
    }
}

/// Which way a swap goes relative to the native currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    /// swapExactETHForTokens: native in, token out
    NativeToToken,
    /// swapExactTokensForETH: token in, native out
    TokenToNative,
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SwapDirection::NativeToToken => write!(f, "native->token"),
            SwapDirection::TokenToNative => write!(f, "token->native"),
        }
    }
}

/// A single buy or sell request, consumed by the transaction builder.
///
/// The deadline is not part of the intent: the builder derives it from a
/// block timestamp fetched at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapIntent {
    pub direction: SwapDirection,
    pub token: Address,
    /// Native wei for NativeToToken, token base units for TokenToNative
    pub amount: U256,
    /// Always zero: no slippage protection is applied
    pub min_output: U256,
    pub recipient: Address,
}

impl SwapIntent {
    /// Buy `token` with `native_amount` wei
    pub fn buy(token: Address, native_amount: U256, recipient: Address) -> Self {
        Self {
            direction: SwapDirection::NativeToToken,
            token,
            amount: native_amount,
            min_output: U256::ZERO,
            recipient,
        }
    }

    /// Sell `token_amount` base units of `token` for native currency
    pub fn sell(token: Address, token_amount: U256, recipient: Address) -> Self {
        Self {
            direction: SwapDirection::TokenToNative,
            token,
            amount: token_amount,
            min_output: U256::ZERO,
            recipient,
        }
    }

    /// Two-hop router path between the token and the wrapped native token
    pub fn path(&self, wrapped_native: Address) -> Vec<Address> {
        match self.direction {
            SwapDirection::NativeToToken => vec![wrapped_native, self.token],
            SwapDirection::TokenToNative => vec![self.token, wrapped_native],
        }
    }
}

/// Prepared getAmountsOut query (no chain call made yet)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub router: Address,
    pub amount_in: U256,
    /// [token, wrapped_native]
    pub path: Vec<Address>,
}

/// What an unsigned transaction does, kept next to its calldata for logging
/// and inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxPurpose {
    Swap {
        direction: SwapDirection,
        path: Vec<Address>,
        amount_out_min: U256,
        deadline: u64,
    },
    Approval {
        token: Address,
        spender: Address,
        amount: U256,
    },
}

/// Legacy (gas price) transaction ready for signing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub from: Address,
    /// Router for swaps, token contract for approvals
    pub to: Address,
    pub value: U256,
    pub input: Bytes,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub nonce: u64,
    pub chain_id: u64,
    pub purpose: TxPurpose,
}

/// Signed EIP-2718 envelope bytes plus the transaction hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub hash: TxHash,
    pub raw: Bytes,
}

/// Mined transaction outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxReceipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub effective_gas_price: u128,
    /// false when the transaction was mined but reverted
    pub success: bool,
}

/// Parse a user supplied address.
///
/// All-lowercase or all-uppercase hex is accepted as is. Mixed-case input
/// must carry a valid EIP-55 checksum. The zero address is rejected.
pub fn parse_address(input: &str) -> Result<Address> {
    let invalid = |reason: String| TraderError::InvalidAddress {
        input: input.to_string(),
        reason,
    };

    let trimmed = input.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex.len() != 40 {
        return Err(invalid(format!(
            "expected 40 hex characters, got {}",
            hex.len()
        )));
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());

    let address = if has_lower && has_upper {
        Address::parse_checksummed(format!("0x{}", hex), None)
            .map_err(|e| invalid(format!("bad checksum: {}", e)))?
    } else {
        hex.parse::<Address>()
            .map_err(|e| invalid(e.to_string()))?
    };

    if address == Address::ZERO {
        return Err(invalid("zero address".to_string()));
    }

    Ok(address)
}

/// Convert a human amount (e.g. 1.5 ETH) into base units with `decimals`.
///
/// Negative amounts and amounts finer than one base unit are rejected rather
/// than rounded.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<U256> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(TraderError::InvalidAmount(format!(
            "{} is negative",
            amount
        )));
    }

    let normalized = amount.normalize();
    let scale = normalized.scale();
    if scale > decimals as u32 {
        return Err(TraderError::InvalidAmount(format!(
            "{} has more than {} decimal places",
            amount, decimals
        )));
    }

    let overflow = || TraderError::InvalidAmount(format!("{} overflows uint256", amount));

    let mantissa = normalized.mantissa().unsigned_abs();
    let multiplier = U256::from(10u64)
        .checked_pow(U256::from(decimals as u32 - scale))
        .ok_or_else(overflow)?;

    U256::from(mantissa).checked_mul(multiplier).ok_or_else(overflow)
}

/// Convert native base units (wei) into a decimal amount of native currency
pub fn format_native(wei: U256) -> Result<Decimal> {
    let raw = u128::try_from(wei)
        .ok()
        .and_then(|v| i128::try_from(v).ok())
        .ok_or_else(|| TraderError::Decode(format!("{} wei does not fit a decimal", wei)))?;

    Decimal::try_from_i128_with_scale(raw, NATIVE_DECIMALS as u32)
        .map(|d| d.normalize())
        .map_err(|e| TraderError::Decode(format!("{} wei: {}", wei, e)))
}
