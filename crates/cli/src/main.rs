//! FundMe CLI - Main entry point

use clap::{Parser, Subcommand};
use fundme_cli::{commands, AppContext};
use fundme_core::Address;
use rust_decimal::Decimal;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "fundme")]
#[command(about = "FundMe - USD-gated crowdfunding ledger", long_about = None)]
struct Cli {
    /// Data directory path
    #[arg(short, long, default_value = "./data")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a ledger (dev networks get a mock ETH/USD feed)
    Deploy {
        /// Target network
        #[arg(long, default_value = "hardhat")]
        network: String,
        /// Owner allowed to withdraw
        #[arg(long)]
        owner: Address,
        /// Initial mock answer (8 decimals)
        #[arg(long)]
        answer: Option<i128>,
        /// Minimum contribution in USD
        #[arg(long)]
        minimum_usd: Option<Decimal>,
    },

    /// Contribute ether
    Fund {
        /// Contributing account
        #[arg(long)]
        from: Address,
        /// Amount in ether
        amount: Decimal,
        /// Optional correlation ID
        #[arg(long)]
        correlation_id: Option<String>,
    },

    /// Withdraw the pooled balance (owner only)
    Withdraw {
        /// Calling account
        #[arg(long)]
        from: Address,
        /// Optional correlation ID
        #[arg(long)]
        correlation_id: Option<String>,
    },

    /// Show the pooled balance
    Balance,

    /// Show the amount recorded for an account
    Contribution { address: Address },

    /// Show the contributor at an index
    Contributor { index: usize },

    /// List contributors since the last withdrawal
    Contributors,

    /// Show the owner
    Owner,

    /// Show the bound price feed
    PriceFeed,

    /// Show the current ETH/USD price
    Price,

    /// Show what an account received from withdrawals
    Payouts { address: Address },

    /// Publish a new mock ETH/USD answer (8 decimals)
    SetPrice { answer: i128 },

    /// Verify the journal hash chain
    Audit,

    /// List known networks
    Networks,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let open = || AppContext::open(&cli.data);

    match cli.command {
        Commands::Deploy {
            network,
            owner,
            answer,
            minimum_usd,
        } => commands::deploy(&cli.data, &network, owner, answer, minimum_usd),

        Commands::Fund {
            from,
            amount,
            correlation_id,
        } => {
            let correlation_id = correlation_id.unwrap_or_else(|| Uuid::new_v4().to_string());
            commands::fund(&mut open()?, from, amount, &correlation_id)
        }

        Commands::Withdraw {
            from,
            correlation_id,
        } => {
            let correlation_id = correlation_id.unwrap_or_else(|| Uuid::new_v4().to_string());
            commands::withdraw(&mut open()?, from, &correlation_id)
        }

        Commands::Balance => commands::balance(&open()?),
        Commands::Contribution { address } => commands::contribution(&open()?, address),
        Commands::Contributor { index } => commands::contributor(&open()?, index),
        Commands::Contributors => commands::contributors(&open()?),
        Commands::Owner => commands::owner(&open()?),
        Commands::PriceFeed => commands::price_feed(&open()?),
        Commands::Price => commands::price(&open()?),
        Commands::Payouts { address } => commands::payouts(&open()?, address),
        Commands::SetPrice { answer } => commands::set_price(&mut open()?, answer),
        Commands::Audit => commands::audit(&open()?),
        Commands::Networks => commands::networks(),
    }
}
