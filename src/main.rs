//! HYPE Portfolio - Main Entry Point
//!
//! Polls the balance aggregator on a fixed cadence and emits each snapshot
//! as a log line plus its JSON serialization.

use anyhow::Result;
use clap::Parser;
use hype_portfolio::{BalanceAggregator, Config};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// HYPE Portfolio CLI
#[derive(Parser)]
#[command(name = "hype-portfolio")]
#[command(version, about = "Aggregate a HYPE wallet's balances across spot, perps, HyperLend and HyperEVM")]
struct Cli {
    /// Wallet address to aggregate (overrides the configured default)
    #[arg(short, long)]
    address: Option<String>,

    /// Fetch one snapshot and exit instead of polling
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging()?;

    let config = Config::load()?;
    config.validate()?;
    log_config(&config);

    let aggregator = BalanceAggregator::from_config(&config)?;
    let address = cli.address.as_deref();

    if cli.once {
        let breakdown = aggregator.get_full_balance(address).await;
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    // Shutdown signal
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received");
        shutdown_clone.store(true, Ordering::SeqCst);
    });

    info!(
        "Polling balances every {}s (ctrl-c to stop)",
        config.poll.interval_secs
    );

    while !shutdown.load(Ordering::SeqCst) {
        let breakdown = aggregator.get_full_balance(address).await;

        info!(
            "Balance: {:.4} HYPE (spot {:.4} / lend {:.4} / native {:.4}) \
             + ${:.2} perps = ${:.2} (~{:.6} BTC)",
            breakdown.total_hype,
            breakdown.spot_hype,
            breakdown.hyper_lend_hype,
            breakdown.evm_native_hype,
            breakdown.perp_value_usd,
            breakdown.total_usd,
            breakdown.total_btc,
        );
        println!("{}", serde_json::to_string(&breakdown)?);

        tokio::time::sleep(Duration::from_secs(config.poll.interval_secs)).await;
    }

    info!("HYPE Portfolio shutdown complete");
    Ok(())
}

/// Initialize logging with file output.
fn init_logging() -> Result<()> {
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    std::fs::create_dir_all("logs")?;

    let file_appender = tracing_appender::rolling::hourly("logs", "hype-portfolio.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    // Leak the guard to keep it alive for the program duration
    Box::leak(Box::new(_guard));

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("hype_portfolio=debug".parse()?)
                .add_directive(Level::INFO.into()),
        )
        .with_writer(std::io::stderr.and(file_writer))
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true)
        .init();

    Ok(())
}

/// Log configuration on startup.
fn log_config(config: &Config) {
    info!("Configuration:");
    info!("   Wallet: {}", config.wallet_address);
    info!("   Info API: {}", config.hyperliquid.api_url);
    info!("   EVM RPC: {}", config.evm.rpc_url);
    info!("   HyperLend token: {}", config.evm.lend_token_address);
    info!("   Poll interval: {}s", config.poll.interval_secs);
}
