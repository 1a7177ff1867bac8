//! End-to-end pricing of a resolved trade.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::cashflow::{calculate_cash_flows, CashFlowLedger, LegTerms};
use crate::mc::{simulate_price_paths, GbmParams, PriceScenarioSet, SimulationConfig};
use crate::valuation::{
    aggregate_results, calculate_npvs, expected_positive_exposure, ExposureProfile,
    ValuationSummary,
};
use trs_core::{TradeTerms, TrsError};

/// Everything produced by one pricing run.
#[derive(Clone, Debug)]
pub struct PricingRun {
    /// Simulated price paths.
    pub scenarios: PriceScenarioSet,
    /// One ledger per path.
    pub ledgers: Vec<CashFlowLedger>,
    /// NPV per path.
    pub npvs: Vec<f64>,
    /// EPE profile.
    pub exposure: ExposureProfile,
    /// Aggregated results.
    pub summary: ValuationSummary,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl PricingRun {
    /// Master seed of the simulation, for replaying the run.
    pub fn seed(&self) -> u64 {
        self.scenarios.seed()
    }
}

/// Monte Carlo TRS pricer.
///
/// Stateless apart from its configuration; each call to
/// [`price`](TrsPricer::price) runs simulate, cash flows, NPV, EPE and
/// aggregation afresh.
///
/// # Examples
///
/// ```rust
/// use trs_core::TradeTerms;
/// use trs_pricing::{SimulationConfig, TrsPricer};
///
/// let terms = TradeTerms::builder("ACME")
///     .notional(1_000_000.0)
///     .tenor(1.0)
///     .payment_frequency(4)
///     .num_simulations(200)
///     .initial_price(50.0)
///     .volatility(0.3)
///     .benchmark_rate(0.04)
///     .funding_spread(0.01)
///     .build()
///     .unwrap();
///
/// let pricer = TrsPricer::new(SimulationConfig::builder().seed(42).build().unwrap());
/// let run = pricer.price(&terms).unwrap();
///
/// assert_eq!(run.summary.num_simulations, 200);
/// assert_eq!(run.summary.epe_profile.len(), 4);
/// assert!(run.summary.epe_profile.iter().all(|e| *e >= 0.0));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct TrsPricer {
    config: SimulationConfig,
}

impl TrsPricer {
    /// Creates a pricer.
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Simulation configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Prices a trade.
    ///
    /// # Errors
    ///
    /// - `TrsError::Validation` if the simulation inputs are invalid
    /// - `TrsError::Numerical` if a numerical guard trips
    pub fn price(&self, terms: &TradeTerms) -> Result<PricingRun, TrsError> {
        let started = Instant::now();
        let params = GbmParams::from_terms(terms, &self.config);

        let scenarios = simulate_price_paths(&params, terms.num_simulations(), &self.config)?;
        let ledgers = calculate_cash_flows(&scenarios, &LegTerms::from_terms(terms))?;

        let rate = terms.benchmark_rate();
        let frequency = terms.payment_frequency();
        let npvs = calculate_npvs(&ledgers, rate, frequency);
        debug!(num_paths = npvs.len(), "discounted path cash flows");

        let exposure = expected_positive_exposure(&ledgers, rate, frequency)?;
        let summary = aggregate_results(terms, &ledgers, &npvs, &exposure)?;
        let elapsed = started.elapsed();

        info!(
            ticker = terms.ticker(),
            num_simulations = summary.num_simulations,
            num_periods = summary.num_periods,
            seed = scenarios.seed(),
            npv_mean = summary.npv_mean,
            peak_epe = summary.peak_epe,
            elapsed_ms = elapsed.as_millis() as u64,
            "pricing run complete"
        );

        Ok(PricingRun {
            scenarios,
            ledgers,
            npvs,
            exposure,
            summary,
            elapsed,
        })
    }
}
