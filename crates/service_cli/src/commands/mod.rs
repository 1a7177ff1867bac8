//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. The trade arguments
//! and the resolve-then-price step are shared by `price` and `evaluate`.

pub mod check;
pub mod evaluate;
pub mod price;

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use tracing::info;

use trs_market::{ResolvedTrade, TradeRequest, TradeResolver};
use trs_pricing::{PricingRun, TrsPricer};

use crate::config::{DriftSetting, TrsConfig};
use crate::{CliError, Result};

/// Output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable console report
    #[default]
    Text,
    /// JSON document on stdout
    Json,
}

/// Trade description shared by `price` and `evaluate`.
///
/// Flags take precedence over the request file, which takes precedence
/// over market data.
#[derive(Args, Debug, Default)]
pub struct TradeArgs {
    /// TOML file holding a trade request
    #[arg(short, long)]
    pub request: Option<PathBuf>,

    /// Reference asset ticker
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// Notional amount
    #[arg(short, long)]
    pub notional: Option<f64>,

    /// Tenor in years
    #[arg(long)]
    pub tenor: Option<f64>,

    /// Settlement periods per year
    #[arg(short = 'f', long)]
    pub payment_frequency: Option<u32>,

    /// Number of Monte Carlo paths (defaults to the configured value)
    #[arg(short = 's', long)]
    pub num_simulations: Option<usize>,

    /// Initial price override
    #[arg(long)]
    pub initial_price: Option<f64>,

    /// Dividend yield override
    #[arg(long)]
    pub dividend_yield: Option<f64>,

    /// Volatility override
    #[arg(long)]
    pub volatility: Option<f64>,

    /// Funding spread override
    #[arg(long)]
    pub funding_spread: Option<f64>,

    /// Benchmark rate override
    #[arg(long)]
    pub benchmark_rate: Option<f64>,

    /// Desk position (payer or receiver)
    #[arg(short, long)]
    pub desk_position: Option<String>,

    /// Master seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Drift convention: zero, benchmark or a fixed annual rate
    #[arg(long)]
    pub drift: Option<DriftSetting>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl TradeArgs {
    /// Build the trade request: request file, then flags, then configured path count.
    pub fn to_request(&self, config: &TrsConfig) -> Result<TradeRequest> {
        let mut request = match &self.request {
            Some(path) => load_request(path)?,
            None => TradeRequest::default(),
        };

        overlay(&mut request.ticker, self.ticker.clone());
        overlay(&mut request.notional, self.notional);
        overlay(&mut request.tenor, self.tenor);
        overlay(&mut request.payment_frequency, self.payment_frequency);
        overlay(&mut request.num_simulations, self.num_simulations);
        overlay(&mut request.initial_price, self.initial_price);
        overlay(&mut request.dividend_yield, self.dividend_yield);
        overlay(&mut request.volatility, self.volatility);
        overlay(&mut request.funding_spread, self.funding_spread);
        overlay(&mut request.benchmark_rate, self.benchmark_rate);
        overlay(&mut request.desk_position, self.desk_position.clone());

        if request.num_simulations.is_none() {
            request.num_simulations = Some(config.simulation.num_simulations);
        }

        Ok(request)
    }

    /// Pricer for this invocation, honouring `--seed` and `--drift`.
    pub fn pricer(&self, config: &TrsConfig) -> Result<TrsPricer> {
        let mut settings = config.clone();
        if let Some(seed) = self.seed {
            settings.simulation.seed = Some(seed);
        }
        if let Some(drift) = self.drift {
            settings.simulation.drift = drift;
        }
        Ok(TrsPricer::new(settings.simulation_config()?))
    }
}

fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn load_request(path: &Path) -> Result<TradeRequest> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::request(format!("{}: {}", path.display(), e)))?;
    toml::from_str(&content).map_err(|e| CliError::request(format!("{}: {}", path.display(), e)))
}

/// Resolve the trade against the configured quote book and price it.
pub fn resolve_and_price(
    config: &TrsConfig,
    args: &TradeArgs,
) -> Result<(ResolvedTrade, PricingRun)> {
    config.validate()?;

    let request = args.to_request(config)?;
    let book = config.market_data();
    let resolved = TradeResolver::new(&book, config.defaults.clone()).resolve(&request)?;

    info!(
        ticker = resolved.terms.ticker(),
        notional = resolved.terms.notional(),
        tenor = resolved.terms.tenor(),
        paths = resolved.terms.num_simulations(),
        "pricing trade"
    );

    let run = args.pricer(config)?.price(&resolved.terms)?;
    Ok((resolved, run))
}
