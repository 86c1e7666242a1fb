//! Configuration management
//!
//! Required settings come from the environment (optionally a .env file):
//!   TRADER_NETWORK   ethereum | bsc            (default: ethereum)
//!   TRADER_DEX       uniswap_v2 | sushiswap | pancakeswap (default: uniswap_v2)
//!   INFURA_URL       RPC endpoint when network = ethereum
//!   BSC_NODE_URL     RPC endpoint when network = bsc
//!   PRIVATE_KEY      hex-encoded signing key
//!   TRADER_SETTINGS  optional path to a TOML tuning file
//!
//! The TOML file only tunes defaults:
//!
//! ```toml
//! [gas]
//! swap = 250000
//! approve = 100000
//!
//! [receipt]
//! timeout_secs = 120
//! poll_interval_ms = 100
//!
//! [nonce]
//! mode = "serialized"
//! ```

use crate::builder::GasLimits;
use crate::error::{Result, TraderError};
use crate::trader::NonceMode;
use crate::types::Network;
use reqwest::Url;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_DEX: &str = "uniswap_v2";

/// Tunables read from the optional TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TraderSettings {
    #[serde(default)]
    pub gas: GasLimits,
    #[serde(default)]
    pub receipt: ReceiptSettings,
    #[serde(default)]
    pub nonce: NonceSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptSettings {
    #[serde(default = "default_receipt_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_receipt_timeout() -> u64 { 120 }
fn default_poll_interval() -> u64 { 100 }

impl Default for ReceiptSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_receipt_timeout(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl ReceiptSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NonceSettings {
    #[serde(default)]
    pub mode: NonceMode,
}

impl TraderSettings {
    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            TraderError::Config(format!(
                "Failed to read settings file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)
            .map_err(|e| TraderError::Config(format!("Failed to parse TOML settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.receipt.poll_interval_ms == 0 {
            return Err(TraderError::Config(
                "receipt.poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything needed to construct a trader
#[derive(Clone)]
pub struct TraderConfig {
    pub network: Network,
    pub dex: String,
    pub rpc_url: Url,
    private_key: String,
    pub settings: TraderSettings,
}

impl TraderConfig {
    /// Build from an environment-style lookup (see module docs for keys)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network: Network = lookup("TRADER_NETWORK")
            .unwrap_or_else(|| Network::Ethereum.to_string())
            .parse()?;

        let dex = lookup("TRADER_DEX").unwrap_or_else(|| DEFAULT_DEX.to_string());

        let rpc_var = network.rpc_env_var();
        let rpc_url = lookup(rpc_var)
            .ok_or_else(|| TraderError::Config(format!("{} not set", rpc_var)))?
            .trim()
            .parse::<Url>()
            .map_err(|e| TraderError::Config(format!("Invalid {}: {}", rpc_var, e)))?;

        let private_key = lookup("PRIVATE_KEY")
            .ok_or_else(|| TraderError::Config("PRIVATE_KEY not set".to_string()))?;

        let settings = match lookup("TRADER_SETTINGS") {
            Some(path) => TraderSettings::load(path.trim())?,
            None => TraderSettings::default(),
        };

        Ok(Self {
            network,
            dex,
            rpc_url,
            private_key,
            settings,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn private_key(&self) -> &str {
        &self.private_key
    }
}

impl std::fmt::Debug for TraderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraderConfig")
            .field("network", &self.network)
            .field("dex", &self.dex)
            .field("rpc_url", &self.rpc_url.host_str())
            .field("private_key", &"[REDACTED]")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Load configuration from `.env` (if present) and the process environment
pub fn load_config() -> Result<TraderConfig> {
    load_config_with(None, &[])
}

/// Load configuration from a specific env file (e.g. `.env.bsc`)
pub fn load_config_from_file(env_file: &str) -> Result<TraderConfig> {
    load_config_with(Some(env_file), &[])
}

/// Load configuration, letting `overrides` (e.g. CLI flags) win over the
/// environment for the keys they name
pub fn load_config_with(env_file: Option<&str>, overrides: &[(&str, String)]) -> Result<TraderConfig> {
    match env_file {
        Some(path) => {
            dotenv::from_filename(path)
                .map_err(|e| TraderError::Config(format!("Failed to load {}: {}", path, e)))?;
        }
        None => {
            dotenv::dotenv().ok();
        }
    }

    TraderConfig::from_lookup(|key| {
        overrides
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.clone())
            .or_else(|| std::env::var(key).ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_ethereum_uniswap() {
        let config = TraderConfig::from_lookup(lookup_from(&[
            ("INFURA_URL", "https://mainnet.infura.io/v3/abc"),
            ("PRIVATE_KEY", "0x01"),
        ]))
        .unwrap();

        assert_eq!(config.network, Network::Ethereum);
        assert_eq!(config.dex, "uniswap_v2");
        assert_eq!(config.rpc_url.host_str(), Some("mainnet.infura.io"));
        assert_eq!(config.settings.gas, GasLimits::default());
        assert_eq!(config.settings.nonce.mode, NonceMode::Unserialized);
    }

    #[test]
    fn test_bsc_uses_bsc_node_url() {
        let config = TraderConfig::from_lookup(lookup_from(&[
            ("TRADER_NETWORK", "bsc"),
            ("TRADER_DEX", "pancakeswap"),
            ("INFURA_URL", "https://mainnet.infura.io/v3/abc"),
            ("BSC_NODE_URL", "https://bsc-dataseed.binance.org"),
            ("PRIVATE_KEY", "0x01"),
        ]))
        .unwrap();

        assert_eq!(config.network, Network::Bsc);
        assert_eq!(config.rpc_url.host_str(), Some("bsc-dataseed.binance.org"));
    }

    #[test]
    fn test_missing_rpc_url() {
        let err = TraderConfig::from_lookup(lookup_from(&[
            ("TRADER_NETWORK", "bsc"),
            ("INFURA_URL", "https://mainnet.infura.io/v3/abc"),
            ("PRIVATE_KEY", "0x01"),
        ]))
        .unwrap_err();

        match err {
            TraderError::Config(msg) => assert!(msg.contains("BSC_NODE_URL")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_network() {
        let err = TraderConfig::from_lookup(lookup_from(&[
            ("TRADER_NETWORK", "polygon"),
            ("PRIVATE_KEY", "0x01"),
        ]))
        .unwrap_err();
        assert!(matches!(err, TraderError::UnsupportedNetwork(_)));
    }

    #[test]
    fn test_missing_private_key() {
        let err = TraderConfig::from_lookup(lookup_from(&[(
            "INFURA_URL",
            "https://mainnet.infura.io/v3/abc",
        )]))
        .unwrap_err();
        assert!(matches!(err, TraderError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = TraderConfig::from_lookup(lookup_from(&[
            ("INFURA_URL", "https://mainnet.infura.io/v3/secret-project-id"),
            ("PRIVATE_KEY", "0xdeadbeefcafe"),
        ]))
        .unwrap();

        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("deadbeefcafe"));
        assert!(!debug_str.contains("secret-project-id"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_missing_env_file() {
        let err = load_config_from_file("/nonexistent/.env.nowhere").unwrap_err();
        assert!(matches!(err, TraderError::Config(_)));
    }

    #[test]
    fn test_load_settings_file() {
        let path = std::env::temp_dir().join(format!("meme-trader-settings-{}.toml", std::process::id()));
        std::fs::write(&path, "[gas]\napprove = 80000\n").unwrap();

        let settings = TraderSettings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.gas.approve, 80_000);
        assert_eq!(settings.gas.swap, 250_000);
    }

    #[test]
    fn test_parse_settings_toml() {
        let toml_str = r#"
[gas]
swap = 300000

[receipt]
timeout_secs = 30

[nonce]
mode = "serialized"
"#;

        let settings = TraderSettings::from_toml_str(toml_str).unwrap();
        assert_eq!(settings.gas.swap, 300_000);
        assert_eq!(settings.gas.approve, 100_000);
        assert_eq!(settings.receipt.timeout(), Duration::from_secs(30));
        assert_eq!(settings.receipt.poll_interval(), Duration::from_millis(100));
        assert_eq!(settings.nonce.mode, NonceMode::Serialized);
    }

    #[test]
    fn test_empty_settings_are_defaults() {
        let settings = TraderSettings::from_toml_str("").unwrap();
        assert_eq!(settings.gas, GasLimits::default());
        assert_eq!(settings.receipt.timeout_secs, 120);
        assert_eq!(settings.nonce.mode, NonceMode::Unserialized);
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let err = TraderSettings::from_toml_str("[receipt]\npoll_interval_ms = 0\n").unwrap_err();
        match err {
            TraderError::Config(msg) => assert!(msg.contains("poll_interval_ms")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_nonce_mode_rejected() {
        let err = TraderSettings::from_toml_str("[nonce]\nmode = \"sometimes\"\n").unwrap_err();
        assert!(matches!(err, TraderError::Config(_)));
    }
}
