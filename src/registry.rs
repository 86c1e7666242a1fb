//! DEX Registry
//!
//! Fixed table of supported Uniswap V2 style routers and the wrapped native
//! token each one routes through. Built once and read-only afterwards; the
//! trader owns its own copy, there is no global.

use crate::error::{Result, TraderError};
use crate::types::ExchangeConfig;
use alloy::primitives::{address, Address};

/// (id, display name, router, wrapped native)
const BUILTIN_DEXES: [(&str, &str, Address, Address); 3] = [
    (
        "uniswap_v2",
        "Uniswap V2",
        address!("7a250d5630B4cF539739dF2C5dAcb4c659F2488D"),
        address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"), // WETH
    ),
    (
        "sushiswap",
        "SushiSwap",
        address!("d9e1cE17f2641f24aE83637ab66a2cca9C378B9F"),
        address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"), // WETH
    ),
    (
        "pancakeswap",
        "PancakeSwap",
        address!("10ED43C718714eb63d5aA57B78B54704E256024E"),
        address!("bb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c"), // WBNB (BSC)
    ),
];

/// Immutable lookup table from DEX id to its configuration
#[derive(Debug, Clone)]
pub struct DexRegistry {
    exchanges: Vec<ExchangeConfig>,
}

impl DexRegistry {
    /// Registry with the built-in router deployments
    pub fn builtin() -> Self {
        let exchanges = BUILTIN_DEXES
            .iter()
            .map(|(id, name, router, wrapped_native)| ExchangeConfig {
                id: id.to_string(),
                router: *router,
                wrapped_native: *wrapped_native,
                name: name.to_string(),
            })
            .collect();

        Self { exchanges }
    }

    /// Find a DEX by id (case-insensitive)
    pub fn lookup(&self, dex_id: &str) -> Result<&ExchangeConfig> {
        let wanted = dex_id.trim().to_lowercase();
        self.exchanges
            .iter()
            .find(|e| e.id == wanted)
            .ok_or_else(|| TraderError::UnsupportedDex {
                id: dex_id.to_string(),
                supported: self.ids().join(", "),
            })
    }

    /// Supported DEX ids in registry order
    pub fn ids(&self) -> Vec<&str> {
        self.exchanges.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExchangeConfig> {
        self.exchanges.iter()
    }
}

impl Default for DexRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
