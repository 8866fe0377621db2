//! Stablebank CLI - Main entry point
//!
//! Drives an in-memory engine with mock price feeds. Useful for poking at
//! the accounting and liquidation math from a shell; nothing here persists.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;

use stablebank_core::fixed::{FEED_PRECISION, MIN_HEALTH_FACTOR, PRECISION};
use stablebank_core::{AccountId, Asset};
use stablebank_engine::{AssetRegistry, EngineConfig, PositionController};
use stablebank_oracle::{MockFeed, PriceFeed, StalenessAdapter};
use stablebank_token::CollateralBank;

#[derive(Parser)]
#[command(name = "stablebank")]
#[command(about = "Stablebank - over-collateralized pegged-token engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a canned scenario against a fresh in-memory engine
    Scenario {
        #[arg(value_enum)]
        name: ScenarioName,
    },

    /// Value a collateral quantity at a given price, and invert it
    Quote {
        /// Asset code (e.g. WETH)
        asset: String,
        /// USD price per whole unit
        #[arg(long, default_value = "2000")]
        price_usd: i64,
        /// Quantity in whole units
        #[arg(long, default_value = "1")]
        quantity: u128,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ScenarioName {
    /// Price crash and third-party liquidation
    Liquidation,
    /// Minting exactly to the health-factor boundary
    Boundary,
}

/// Build an engine over both stock assets, sharing one mock feed
fn build_engine(feed: Arc<MockFeed>) -> anyhow::Result<PositionController> {
    let weth: Arc<dyn PriceFeed> = Arc::new(StalenessAdapter::with_default_timeout(feed.clone()));
    let wbtc: Arc<dyn PriceFeed> = Arc::new(StalenessAdapter::with_default_timeout(feed));
    let registry = AssetRegistry::new(vec![Asset::weth(), Asset::wbtc()], vec![weth, wbtc])
        .context("building asset registry")?;
    Ok(PositionController::new(
        registry,
        EngineConfig::default(),
        CollateralBank::new(),
    ))
}

fn fmt_fixed(value: u128) -> String {
    if value == u128::MAX {
        return "MAX".to_string();
    }
    format!("{}.{:018}", value / PRECISION, value % PRECISION)
}

fn print_account(engine: &PositionController, user: &AccountId) -> anyhow::Result<()> {
    let (debt, collateral_usd) = engine.account_information(user)?;
    let hf = engine.health_factor_of(user)?;
    println!(
        "   {user}: collateral ${}, debt {}, health factor {}",
        fmt_fixed(collateral_usd),
        fmt_fixed(debt),
        fmt_fixed(hf),
    );
    Ok(())
}

fn scenario_liquidation() -> anyhow::Result<()> {
    let feed = Arc::new(MockFeed::new());
    feed.set_price(Asset::weth(), 2_000_00000000);
    feed.set_price(Asset::wbtc(), 30_000_00000000);
    let mut engine = build_engine(feed.clone())?;

    let alice: AccountId = "alice".parse()?;
    let liquidator: AccountId = "liquidator".parse()?;
    engine
        .bank_mut()
        .deposit_external(&alice, &Asset::weth(), 10 * PRECISION)?;
    engine
        .bank_mut()
        .deposit_external(&liquidator, &Asset::weth(), 100 * PRECISION)?;

    println!("1. ALICE deposits 10 WETH at $2000 and mints 100 debt units");
    engine.deposit_and_mint(&alice, &Asset::weth(), 10 * PRECISION, 100 * PRECISION)?;
    print_account(&engine, &alice)?;

    println!("2. LIQUIDATOR takes a large healthy position to fund the cover");
    engine.deposit_and_mint(&liquidator, &Asset::weth(), 100 * PRECISION, 100 * PRECISION)?;
    print_account(&engine, &liquidator)?;

    println!("3. WETH crashes to $18");
    feed.set_price(Asset::weth(), 18_00000000);
    print_account(&engine, &alice)?;

    println!("4. LIQUIDATOR covers all 100 debt units");
    engine.liquidate(&liquidator, &Asset::weth(), &alice, 100 * PRECISION)?;
    print_account(&engine, &alice)?;
    println!(
        "   seized collateral paid out: {} WETH",
        fmt_fixed(engine.bank().balance_of(&liquidator, &Asset::weth())),
    );
    Ok(())
}

fn scenario_boundary() -> anyhow::Result<()> {
    let feed = Arc::new(MockFeed::new());
    feed.set_price(Asset::weth(), 2_000_00000000);
    feed.set_price(Asset::wbtc(), 30_000_00000000);
    let mut engine = build_engine(feed)?;

    let alice: AccountId = "alice".parse()?;
    engine
        .bank_mut()
        .deposit_external(&alice, &Asset::weth(), PRECISION)?;

    println!("1. ALICE deposits 1 WETH at $2000");
    engine.deposit_collateral(&alice, &Asset::weth(), PRECISION)?;

    println!("2. Minting 1000 debt units lands exactly on the boundary");
    engine.mint_debt(&alice, 1_000 * PRECISION)?;
    print_account(&engine, &alice)?;
    assert_eq!(engine.health_factor_of(&alice)?, MIN_HEALTH_FACTOR);

    println!("3. One more unit must break the health factor");
    match engine.mint_debt(&alice, 1) {
        Err(err) => println!("   rejected: {err}"),
        Ok(()) => anyhow::bail!("boundary mint unexpectedly succeeded"),
    }
    print_account(&engine, &alice)?;
    Ok(())
}

fn quote(asset: &str, price_usd: i64, quantity: u128) -> anyhow::Result<()> {
    let asset: Asset = asset.parse()?;
    let feed_price = price_usd
        .checked_mul(FEED_PRECISION as i64)
        .with_context(|| format!("price out of range: {price_usd}"))?;
    let quantity_fp = quantity
        .checked_mul(PRECISION)
        .with_context(|| format!("quantity out of range: {quantity}"))?;

    let feed = Arc::new(MockFeed::new());
    feed.set_price(asset.clone(), feed_price);

    let adapter: Arc<dyn PriceFeed> = Arc::new(StalenessAdapter::with_default_timeout(feed));
    let registry = AssetRegistry::new(vec![asset.clone()], vec![adapter])?;

    let risk = stablebank_engine::RiskEngine::new(EngineConfig::default());
    let usd = risk.usd_value(&registry, &asset, quantity_fp)?;
    let back = risk.quantity_from_usd(&registry, &asset, usd)?;

    println!("{quantity} {asset} at ${price_usd} = ${}", fmt_fixed(usd));
    println!("inverse: {} {asset}", fmt_fixed(back));
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Scenario { name } => match name {
            ScenarioName::Liquidation => scenario_liquidation(),
            ScenarioName::Boundary => scenario_boundary(),
        },
        Commands::Quote {
            asset,
            price_usd,
            quantity,
        } => quote(&asset, price_usd, quantity),
    }
}
