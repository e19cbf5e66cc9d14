//! Solana Insight Agent CLI
//!
//! Command-line interface for exercising the analysis actions and the raw
//! data API endpoints.

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use solana_insight_agent::api::TrackerClient;
use solana_insight_agent::{dispatch, plugin, ActionResponse, ChatMessage, Config, ResponseSink, Result};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "insight-agent")]
#[command(about = "AI-powered Solana token and wallet analysis agent")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the token analysis action against a chat message
    AnalyzeToken {
        /// Message text, e.g. "Analyze this token <address>"
        message: String,
    },

    /// Run the wallet analysis action against a chat message
    AnalyzeWallet {
        /// Message text, e.g. "Analyze this wallet <address>"
        message: String,
    },

    /// Fetch a token document from the data API
    Token {
        /// Token mint address
        address: String,
    },

    /// List trending tokens
    Trending {
        /// Timeframe such as "1h" or "24h" (provider default when omitted)
        #[arg(short, long)]
        timeframe: Option<String>,
    },

    /// Search tokens by name or symbol
    Search {
        /// Search query
        query: String,
    },

    /// List the holder roster of a token
    Holders {
        /// Token mint address
        address: String,
    },

    /// Aggregate the ranked top-trader wallets across all listing pages
    TopTraders {
        /// Provider sort key, e.g. "total" or "winPercentage"
        #[arg(short, long, default_value = "total")]
        sort_by: String,
    },

    /// Fetch the PnL document for a wallet
    Pnl {
        /// Wallet address
        wallet: String,
    },

    /// Fetch one wallet's trades in one token
    TokenTrades {
        /// Wallet address
        wallet: String,
        /// Token mint address
        token: String,
    },

    /// Fetch the multi-token terminal feed
    Terminal,

    /// Resolve the pool id for a token
    PoolId {
        /// Token mint address
        token: String,
        /// Quote token to match (first pool when omitted)
        #[arg(short, long)]
        quote: Option<String>,
    },

    /// Show current configuration
    Config,
}

/// Sink that prints replies to stdout, the CLI stand-in for the host
/// runtime's callback.
struct StdoutSink;

#[async_trait]
impl ResponseSink for StdoutSink {
    async fn deliver(&self, response: ActionResponse) -> Result<()> {
        println!("{}", response.text);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Load config
    let config = match cli.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => Config::from_env(),
    };

    match cli.command {
        Commands::AnalyzeToken { message } => {
            run_action(&config, "ANALYZE_TOKEN", message).await?;
        }
        Commands::AnalyzeWallet { message } => {
            run_action(&config, "ANALYZE_WALLET", message).await?;
        }
        Commands::Token { address } => {
            let client = TrackerClient::new(&config)?;
            print_json(&client.token_overview(&address).await?)?;
        }
        Commands::Trending { timeframe } => {
            let client = TrackerClient::new(&config)?;
            print_json(&client.trending(timeframe.as_deref()).await?)?;
        }
        Commands::Search { query } => {
            let client = TrackerClient::new(&config)?;
            print_json(&client.search(&query).await?)?;
        }
        Commands::Holders { address } => {
            let client = TrackerClient::new(&config)?;
            print_json(&client.holders(&address).await?)?;
        }
        Commands::TopTraders { sort_by } => {
            let client = TrackerClient::new(&config)?;
            let wallets = client.top_traders(&sort_by).await?;
            tracing::info!(wallets = wallets.len(), "aggregated top traders");
            print_json(&wallets)?;
        }
        Commands::Pnl { wallet } => {
            let client = TrackerClient::new(&config)?;
            print_json(&client.wallet_pnl(&wallet).await?)?;
        }
        Commands::TokenTrades { wallet, token } => {
            let client = TrackerClient::new(&config)?;
            print_json(&client.wallet_token_trades(&wallet, &token).await?)?;
        }
        Commands::Terminal => {
            let client = TrackerClient::new(&config)?;
            print_json(&client.terminal_data().await?)?;
        }
        Commands::PoolId { token, quote } => {
            let client = TrackerClient::new(&config)?;
            print_json(&client.pool_id_for(&token, quote.as_deref()).await?)?;
        }
        Commands::Config => {
            print_json(&config)?;
        }
    }

    Ok(())
}

async fn run_action(config: &Config, name: &str, message: String) -> Result<()> {
    let plugin = plugin(config)?;
    let action = plugin
        .action(name)
        .ok_or_else(|| solana_insight_agent::Error::InvalidArgument(format!("unknown action {name}")))?;

    dispatch(action, &ChatMessage::new(message), &StdoutSink).await
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
