//! Check command implementation
//!
//! Validates the configuration and prints the effective settings.

use tracing::info;

use crate::config::TrsConfig;
use crate::Result;

/// Run the check command
pub fn run(config: &TrsConfig, path: &str) -> Result<()> {
    info!("Checking configuration...");

    config.validate()?;

    let simulation = config.simulation_config()?;
    let thresholds = &config.decision;

    println!("Configuration: {}", path);
    println!("  Log level: {}", config.log_level);
    println!();
    println!("Simulation:");
    println!("  Paths: {}", config.simulation.num_simulations);
    match simulation.seed() {
        Some(seed) => println!("  Seed: {}", seed),
        None => println!("  Seed: (fresh per run)"),
    }
    println!("  Drift: {}", config.simulation.drift);
    println!("  Chunk size: {}", simulation.chunk_size());
    println!();
    println!("Market defaults:");
    println!("  Benchmark rate: {:.2}%", config.defaults.benchmark_rate * 100.0);
    println!("  Funding spread: {:.2}%", config.defaults.funding_spread * 100.0);
    println!("  Volatility: {:.1}%", config.defaults.volatility * 100.0);
    println!("  Dividend yield: {:.2}%", config.defaults.dividend_yield * 100.0);
    println!("  Lookback: {} days", config.defaults.lookback_days);
    println!();
    println!("Decision thresholds (fraction of notional):");
    println!("  NPV: green >= {}, yellow >= {}", thresholds.npv_green, thresholds.npv_yellow);
    println!("  VaR: green <= {}, yellow <= {}", thresholds.var_green, thresholds.var_yellow);
    println!("  EPE: green <= {}, yellow <= {}", thresholds.epe_green, thresholds.epe_yellow);
    println!(
        "  Scaling: baseline vol {}, baseline tenor {}, clamp [{}, {}], EPE exponent {}",
        thresholds.baseline_volatility,
        thresholds.baseline_tenor,
        thresholds.min_scale,
        thresholds.max_scale,
        thresholds.epe_tenor_exponent
    );
    println!();

    if config.market.is_empty() {
        println!("Market: no quotes configured");
    } else {
        println!("Market ({} tickers):", config.market.len());
        for (ticker, quote) in &config.market {
            let price = quote
                .price
                .or_else(|| quote.closes.last().copied())
                .map_or_else(|| "-".to_string(), |p| format!("{:.2}", p));
            println!("  {:<8} price {:>10}  closes {:>4}", ticker, price, quote.closes.len());
        }
    }

    info!("Configuration OK");
    Ok(())
}
