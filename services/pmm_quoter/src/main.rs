//! PMM Quoter
//!
//! Offline quote calculator for PMM pools. Reads a raw pool state file
//! (contract integers plus token decimals), scales it into a reserve
//! snapshot and prints the mid price and the net amounts received for
//! selling base and quote.
//!
//! Architecture:
//! State file → normalize → ReserveSnapshot → PmmEngine → stdout

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use pmm::{BigDecimal, DecimalContext, PmmEngine, PmmPoolView};
use pmm_config::PmmConfig;

mod report;

use report::{PoolStateFile, QuoteReport, RenderOptions};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "pmm_quoter")]
#[command(about = "Quote PMM pool sales from a raw pool state file")]
struct Args {
    /// Pool state file (TOML)
    #[arg(short, long)]
    state: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment (development, staging, production)
    #[arg(short, long)]
    environment: Option<String>,

    /// Amount of base to sell
    #[arg(long, default_value = "1")]
    sell_base: String,

    /// Amount of quote to sell
    #[arg(long, default_value = "1")]
    sell_quote: String,

    /// Print gross output and fee breakdown
    #[arg(short, long)]
    detailed: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = PmmConfig::load(args.config.as_deref(), args.environment.as_deref())?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("pmm_quoter={}", config.logging.level).parse()?)
                .add_directive(format!("pmm={}", config.logging.level).parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!("Configuration: {:?}", config);
    info!("Pool state file: {:?}", args.state);

    let ctx = DecimalContext::try_new(
        config.precision.significant_digits,
        config.precision.exponential_at,
    )?;
    let engine = PmmEngine::new(ctx);

    let file = PoolStateFile::load(&args.state)?;
    let snapshot = file
        .state
        .normalize(&file.decimals)
        .context("Failed to normalize pool state")?;
    if let Err(e) = snapshot.validate() {
        warn!("Pool state is malformed, quotes will be zero: {}", e);
    }
    info!(
        "Loaded pool: regime={} B={} Q={} B0={} Q0={}",
        snapshot.regime(),
        ctx.format(snapshot.base()),
        ctx.format(snapshot.quote()),
        ctx.format(snapshot.base_target()),
        ctx.format(snapshot.quote_target()),
    );

    let base_amount = parse_amount(&args.sell_base, "sell-base")?;
    let quote_amount = parse_amount(&args.sell_quote, "sell-quote")?;

    let pool = PmmPoolView::new(&engine, &snapshot);
    let name = file.name.as_deref().unwrap_or("unnamed pool");
    let report = QuoteReport::build(&pool, name, base_amount, quote_amount);

    for e in report.errors() {
        warn!("No executable trade: {}", e);
    }

    print!(
        "{}",
        report.render(
            &ctx,
            &file.decimals,
            RenderOptions {
                fixed_output: config.display.fixed_output,
                detailed: args.detailed,
            },
        )
    );

    Ok(())
}

fn parse_amount(raw: &str, flag: &str) -> Result<BigDecimal> {
    BigDecimal::from_str(raw.trim()).with_context(|| format!("Invalid --{} amount: {:?}", flag, raw))
}
