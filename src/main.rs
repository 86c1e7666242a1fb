//! Meme Coin Trader CLI
//!
//! Thin command line wrapper over `MemeCoinTrader`.
//!
//! Usage:
//!   meme-trader price <token>... [--amount 1]
//!   meme-trader buy <token> <native_amount>
//!   meme-trader sell <token> <raw_token_amount>
//!   meme-trader approve <token>
//!   meme-trader dexes
//!
//! Network, DEX and credentials come from `.env` (see `config.rs`); the
//! global flags override them.
//!
//! Created: 2026-10-18

use alloy::primitives::U256;
use alloy::providers::RootProvider;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::future::join_all;
use meme_trader::config::load_config_with;
use meme_trader::{DexRegistry, MemeCoinTrader, RpcChainClient, TxReceipt};
use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Meme Coin Trader: V2 router swaps on Ethereum and BSC
#[derive(Parser)]
#[command(name = "meme-trader")]
struct Args {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Command,
}

/// Overrides for the `.env` configuration
#[derive(clap::Args)]
struct ConnectionArgs {
    /// Network to trade on (ethereum, bsc)
    #[arg(long, global = true)]
    network: Option<String>,

    /// DEX id (uniswap_v2, sushiswap, pancakeswap)
    #[arg(long, global = true)]
    dex: Option<String>,

    /// TOML settings file (gas limits, receipt wait, nonce mode)
    #[arg(long, global = true, env = "TRADER_SETTINGS")]
    settings: Option<String>,

    /// Env file to load instead of `.env` (e.g. .env.bsc)
    #[arg(long, global = true)]
    env_file: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Quote tokens in native currency
    Price {
        #[arg(required = true)]
        tokens: Vec<String>,

        /// Whole-token amount to quote
        #[arg(long, default_value = "1")]
        amount: Decimal,
    },
    /// Buy a token with native currency
    Buy { token: String, native_amount: Decimal },
    /// Sell raw token units for native currency (approve first)
    Sell { token: String, raw_amount: String },
    /// Grant the router an unlimited allowance on a token
    Approve { token: String },
    /// List supported DEX ids
    Dexes,
}

type HttpTrader = MemeCoinTrader<RpcChainClient<RootProvider>>;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let registry = DexRegistry::builtin();

    match args.command {
        Command::Dexes => {
            for dex in registry.iter() {
                println!("{:<12} {:<12} router {}", dex.id, dex.name, dex.router_checksummed());
            }
        }
        Command::Price { tokens, amount } => {
            let trader = connect(&args.connection, &registry)?;
            let symbol = trader.session().network().native_symbol();

            let quotes = join_all(tokens.iter().map(|t| trader.get_price_for(t, amount))).await;

            for (token, quote) in tokens.iter().zip(quotes) {
                match quote {
                    Some(price) => println!("{} {} = {} {}", amount, token, price, symbol),
                    None => warn!("No price for {}", token),
                }
            }
        }
        Command::Buy { token, native_amount } => {
            let trader = connect(&args.connection, &registry)?;
            let receipt = trader.buy(&token, native_amount).await?;
            print_receipt(&receipt)?;
        }
        Command::Sell { token, raw_amount } => {
            let amount: U256 = raw_amount
                .trim()
                .parse()
                .with_context(|| format!("Invalid token amount: {}", raw_amount))?;
            let trader = connect(&args.connection, &registry)?;
            let receipt = trader.sell(&token, amount).await?;
            print_receipt(&receipt)?;
        }
        Command::Approve { token } => {
            let trader = connect(&args.connection, &registry)?;
            let receipt = trader.approve(&token).await?;
            print_receipt(&receipt)?;
        }
    }

    Ok(())
}

/// Load configuration (flags win over the environment) and build the trader
fn connect(connection: &ConnectionArgs, registry: &DexRegistry) -> Result<HttpTrader> {
    let mut overrides = Vec::new();
    if let Some(network) = &connection.network {
        overrides.push(("TRADER_NETWORK", network.clone()));
    }
    if let Some(dex) = &connection.dex {
        overrides.push(("TRADER_DEX", dex.clone()));
    }
    if let Some(settings) = &connection.settings {
        overrides.push(("TRADER_SETTINGS", settings.clone()));
    }

    let config = load_config_with(connection.env_file.as_deref(), &overrides)
        .context("Failed to load configuration")?;
    info!("Configuration loaded: {} / {}", config.network, config.dex);
    info!(
        "Gas limits: swap {} / approve {} | receipt timeout {:?}",
        config.settings.gas.swap,
        config.settings.gas.approve,
        config.settings.receipt.timeout()
    );

    MemeCoinTrader::from_config(&config, registry).context("Failed to construct trader")
}

fn print_receipt(receipt: &TxReceipt) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(receipt)?);
    if !receipt.success {
        anyhow::bail!("Transaction {} reverted", receipt.transaction_hash);
    }
    Ok(())
}
