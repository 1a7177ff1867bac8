//! TRS CLI - Command Line Operations for Total Return Swap Pricing
//!
//! Operational entry point for the TRS Monte Carlo pricer.
//!
//! # Commands
//!
//! - `trs price --ticker <T> --notional <N> --tenor <Y>` - Price a trade
//! - `trs evaluate ...` - Price a trade and run the decision engine
//! - `trs check` - Validate the configuration and list quoted tickers
//!
//! # Architecture
//!
//! As the service layer, this crate wires the configuration, the static
//! quote book, trade resolution, the pricing pipeline and the decision
//! engine together.

use std::path::Path;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod report;

pub use error::{CliError, Result};

use commands::TradeArgs;
use config::TrsConfig;

/// TRS Monte Carlo pricer CLI
#[derive(Parser)]
#[command(name = "trs")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a total return swap by Monte Carlo simulation
    Price(TradeArgs),

    /// Price a trade and evaluate it against the decision thresholds
    Evaluate(TradeArgs),

    /// Validate the configuration and print the effective settings
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration first so the log level can come from it
    let config = TrsConfig::load_or_default(Path::new(&cli.config))?.with_env_override()?;
    init_tracing(&config, cli.verbose);

    debug!(path = %cli.config, "configuration loaded");

    match cli.command {
        Commands::Price(args) => commands::price::run(&config, &args),
        Commands::Evaluate(args) => commands::evaluate::run(&config, &args),
        Commands::Check => commands::check::run(&config, &cli.config),
    }
}

fn init_tracing(config: &TrsConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { config.log_level.as_str() };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
