//! Price command implementation
//!
//! Resolves a trade against the configured quote book, runs the Monte Carlo
//! pipeline and prints the summary report.

use serde::Serialize;
use tracing::info;

use trs_market::InputSources;
use trs_pricing::ValuationSummary;

use super::{resolve_and_price, OutputFormat, TradeArgs};
use crate::config::TrsConfig;
use crate::report::summary_report;
use crate::Result;

/// JSON document emitted by `trs price --format json`
#[derive(Serialize)]
struct PriceOutput<'a> {
    seed: u64,
    sources: &'a InputSources,
    summary: &'a ValuationSummary,
}

/// Run the price command
pub fn run(config: &TrsConfig, args: &TradeArgs) -> Result<()> {
    let (resolved, run) = resolve_and_price(config, args)?;

    match args.format {
        OutputFormat::Text => println!("{}", summary_report(&run, &resolved.sources)),
        OutputFormat::Json => {
            let output = PriceOutput {
                seed: run.seed(),
                sources: &resolved.sources,
                summary: &run.summary,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    info!(
        npv_mean = run.summary.npv_mean,
        peak_epe = run.summary.peak_epe,
        "Pricing complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trs_market::Quote;

    #[test]
    fn test_json_summary_names_epe_dates() {
        let mut config = TrsConfig::default();
        config.simulation.num_simulations = 50;
        config.simulation.seed = Some(3);
        config
            .market
            .insert("ACME".to_string(), Quote::with_price(50.0));
        let args = TradeArgs {
            ticker: Some("ACME".to_string()),
            notional: Some(1_000_000.0),
            tenor: Some(1.0),
            payment_frequency: Some(4),
            ..TradeArgs::default()
        };
        let (resolved, run) = resolve_and_price(&config, &args).unwrap();
        let output = PriceOutput {
            seed: run.seed(),
            sources: &resolved.sources,
            summary: &run.summary,
        };

        let json = serde_json::to_value(&output).unwrap();
        let summary = &json["summary"];
        assert!(summary.get("epe_times").is_none());
        assert_eq!(summary["epe_dates"], serde_json::json!([0.25, 0.5, 0.75, 1.0]));
        assert_eq!(json["seed"], 3);
    }
}
