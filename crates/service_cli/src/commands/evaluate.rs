//! Evaluate command implementation
//!
//! Prices a trade and runs the decision engine on the valuation summary.

use serde::Serialize;
use tracing::info;

use trs_pricing::ValuationSummary;
use trs_risk::DecisionResult;

use super::{resolve_and_price, OutputFormat, TradeArgs};
use crate::config::TrsConfig;
use crate::report::{decision_report, summary_report};
use crate::Result;

/// JSON document emitted by `trs evaluate --format json`
#[derive(Serialize)]
struct EvaluateOutput<'a> {
    seed: u64,
    summary: &'a ValuationSummary,
    decision: &'a DecisionResult,
}

/// Run the evaluate command
pub fn run(config: &TrsConfig, args: &TradeArgs) -> Result<()> {
    let engine = config.decision_engine()?;
    let (resolved, run) = resolve_and_price(config, args)?;
    let decision = engine.evaluate(&run.summary);

    match args.format {
        OutputFormat::Text => {
            println!("{}", summary_report(&run, &resolved.sources));
            println!();
            println!("{}", decision_report(&run, &decision, engine.thresholds()));
        }
        OutputFormat::Json => {
            let output = EvaluateOutput {
                seed: run.seed(),
                summary: &run.summary,
                decision: &decision,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    info!(status = %decision.overall_status, "Evaluation complete");
    Ok(())
}
