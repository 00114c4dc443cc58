//! CLI commands

use fundme_core::{Address, Wei, WEI_PER_ETHER};
use fundme_ledger::{LedgerConfig, Usd};
use fundme_oracle::PriceFeed;
use rust_decimal::Decimal;

use crate::context::AppContext;
use crate::network::NETWORKS;

/// Deploy a ledger into the data directory
pub fn deploy(
    data: &std::path::Path,
    network: &str,
    owner: Address,
    answer: Option<i128>,
    minimum_usd: Option<Decimal>,
) -> Result<(), anyhow::Error> {
    let mut config = LedgerConfig::default();
    if let Some(minimum) = minimum_usd {
        config = config.with_minimum_usd(Usd::from_dollars(minimum)?);
    }

    let ctx = AppContext::deploy(data, network, owner, answer, config)?;
    let deployment = ctx.deployment();

    println!("✅ Deployed on {} (chain {})", deployment.network, deployment.chain_id);
    println!("   Owner:      {}", deployment.owner);
    println!("   Price feed: {} (mock)", deployment.price_feed);
    println!("   Minimum:    ${}", deployment.ledger.minimum_usd);
    Ok(())
}

/// Contribute ether from an account
pub fn fund(
    ctx: &mut AppContext,
    from: Address,
    ether: Decimal,
    correlation_id: &str,
) -> Result<(), anyhow::Error> {
    let amount = Wei::from_ether(ether)?;
    let records = ctx.fund(from, amount, correlation_id)?;

    let sequence = records.last().map_or(0, |r| r.sequence);
    println!(
        "✅ Funded {} ETH from {} (seq: {})",
        amount.to_ether_string(),
        from,
        sequence
    );
    Ok(())
}

/// Sweep the pooled balance to the owner
pub fn withdraw(
    ctx: &mut AppContext,
    from: Address,
    correlation_id: &str,
) -> Result<(), anyhow::Error> {
    let (amount, records) = ctx.withdraw(from, correlation_id)?;

    let sequence = records.last().map_or(0, |r| r.sequence);
    println!(
        "✅ Withdrew {} ETH to {} (seq: {})",
        amount.to_ether_string(),
        from,
        sequence
    );
    Ok(())
}

pub fn balance(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let balance = ctx.ledger.balance();
    println!("💰 Balance: {} ETH ({} wei)", balance.to_ether_string(), balance);
    Ok(())
}

pub fn contribution(ctx: &AppContext, address: Address) -> Result<(), anyhow::Error> {
    let amount = ctx.ledger.contribution(&address);
    println!("{}: {} ETH", address, amount.to_ether_string());
    Ok(())
}

pub fn contributor(ctx: &AppContext, index: usize) -> Result<(), anyhow::Error> {
    let address = ctx.ledger.contributor_at(index)?;
    println!("[{}] {}", index, address);
    Ok(())
}

pub fn contributors(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let contributors = ctx.ledger.contributors();
    if contributors.is_empty() {
        println!("No contributors since the last withdrawal");
        return Ok(());
    }

    println!("{:<6} {:<44} {:>24}", "INDEX", "CONTRIBUTOR", "TOTAL (ETH)");
    for (index, address) in contributors.iter().enumerate() {
        println!(
            "{:<6} {:<44} {:>24}",
            index,
            address,
            ctx.ledger.contribution(address).to_ether_string()
        );
    }
    Ok(())
}

pub fn owner(ctx: &AppContext) -> Result<(), anyhow::Error> {
    println!("{}", ctx.ledger.owner());
    Ok(())
}

pub fn price_feed(ctx: &AppContext) -> Result<(), anyhow::Error> {
    println!("{}", ctx.ledger.price_feed());
    Ok(())
}

/// Current ETH/USD price and the minimum contribution in ether
pub fn price(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let quote = ctx.ledger.feed().latest_price()?;
    let (_, one_ether) = ctx.ledger.quote(Wei::new(WEI_PER_ETHER))?;

    println!("📈 ETH/USD: {} (round {})", quote, ctx.aggregator().latest_round());
    println!("   1 ETH = ${}", one_ether);
    println!("   Minimum contribution: ${}", ctx.ledger.config().minimum_usd);
    Ok(())
}

pub fn payouts(ctx: &AppContext, address: Address) -> Result<(), anyhow::Error> {
    let received = ctx.ledger.payout().credited(&address);
    println!("{} received {} ETH", address, received.to_ether_string());
    Ok(())
}

pub fn set_price(ctx: &mut AppContext, answer: i128) -> Result<(), anyhow::Error> {
    ctx.set_price(answer)?;
    println!("✅ Mock answer set to {} (round {})", answer, ctx.aggregator().latest_round());
    Ok(())
}

pub fn audit(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let count = ctx.audit()?;
    println!("✅ Hash chain verified ({} records)", count);
    Ok(())
}

pub fn networks() -> Result<(), anyhow::Error> {
    println!("{:<12} {:>8}  {}", "NETWORK", "CHAIN", "ETH/USD FEED");
    for network in NETWORKS {
        println!(
            "{:<12} {:>8}  {}",
            network.name,
            network.chain_id,
            network.eth_usd_price_feed.unwrap_or("mock")
        );
    }
    Ok(())
}
