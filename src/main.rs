//! Main entry point for the tier cutoffs snapshotter
//!
//! Loads configuration, initializes logging and performs one full sweep
//! (or an offline recompute from a saved snapshot).

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tier_cutoffs::config::AppConfig;
use tier_cutoffs::service::Pipeline;
use tracing::{error, info};

/// Tier Cutoffs - league leaderboard snapshotter and tier threshold calculator
#[derive(Parser)]
#[command(
    name = "tier-cutoffs",
    version,
    about = "Snapshot the league leaderboard and derive percentile tier thresholds",
    long_about = "Tier Cutoffs pages through the public league leaderboard, accumulates the \
                 full ranked population, computes rating and skill thresholds for each tier \
                 and writes leaderboard.json, thresholds.json and leaderboard.csv."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Output directory override
    #[arg(short, long, value_name = "DIR", help = "Directory to write artifacts into")]
    output_dir: Option<PathBuf>,

    /// Page delay override
    #[arg(long, value_name = "MS", help = "Override delay between page requests")]
    page_delay_ms: Option<u64>,

    /// Recompute thresholds from an existing snapshot instead of fetching
    #[arg(
        long,
        value_name = "FILE",
        help = "Recompute thresholds from a saved leaderboard.json or leaderboard.csv"
    )]
    from_snapshot: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without fetching")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Display the effective settings and tier table
fn display_startup_banner(config: &AppConfig) {
    info!("Tier Cutoffs {}", tier_cutoffs::VERSION);
    info!("   Endpoint: {}", config.api.endpoint);
    info!(
        "   Page limit: {}, delay: {}ms",
        config.api.page_limit, config.api.page_delay_ms
    );
    info!("   Output dir: {}", config.output.dir.display());
    info!(
        "   Tiers: {} (top '{}', max rd {}, bound {:?})",
        config.tiers.cuts.len(),
        config.tiers.top_tier,
        config.tiers.max_rd,
        config.tiers.bound
    );
    for cut in &config.tiers.cuts {
        info!("     {:>5} {}", cut.name, cut.fraction);
    }
}

fn or_dash(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Load configuration and apply CLI overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }

    if let Some(delay) = args.page_delay_ms {
        config.api.page_delay_ms = delay;
    }

    tier_cutoffs::config::validate_config(&config)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    display_startup_banner(&config);

    if args.dry_run {
        info!("Dry run completed - configuration is valid");
        return Ok(());
    }

    let pipeline = match Pipeline::from_config(&config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to initialize pipeline: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = match &args.from_snapshot {
        Some(path) => pipeline.recompute(path).await,
        None => pipeline.run().await,
    };

    match outcome {
        Ok(summary) => {
            for tier in summary.thresholds.iter() {
                info!(
                    "{:>5}: tr {} glicko {} gxe {}",
                    tier.tier,
                    or_dash(tier.record.tr),
                    tier.record.glicko,
                    or_dash(tier.record.gxe)
                );
            }
            Ok(())
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
