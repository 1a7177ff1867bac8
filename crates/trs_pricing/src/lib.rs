//! # trs_pricing: Monte Carlo TRS Valuation (Layer 3)
//!
//! Prices a total return swap from resolved [`TradeTerms`](trs_core::TradeTerms):
//!
//! ```text
//! TradeTerms
//!   └─ simulate_price_paths   PriceScenarioSet (N × (n+1))
//!        └─ calculate_cash_flows   Vec<CashFlowLedger>
//!             ├─ calculate_npvs            NPV per path
//!             ├─ expected_positive_exposure  EPE per period
//!             └─ aggregate_results         ValuationSummary
//! ```
//!
//! [`TrsPricer`] runs the whole chain. Each stage is also public for
//! callers that need intermediate results.
//!
//! ## Parallelism
//!
//! Every stage is parallel along the path axis with `rayon`. Random draws
//! come from one [`rng::TrsRng`] stream per fixed-size partition of paths,
//! seeded from the master seed, so seeded runs are reproducible regardless
//! of thread count.
//!
//! ## Features
//!
//! - `serde`: `Serialize` for summaries, ledgers and exposure profiles

#![warn(missing_docs)]

pub mod cashflow;
pub mod mc;
pub mod pipeline;
pub mod rng;
pub mod valuation;

pub use cashflow::{calculate_cash_flows, CashFlowLedger, CashFlowRecord, LegTerms};
pub use mc::{simulate_price_paths, Drift, GbmParams, PriceScenarioSet, SimulationConfig};
pub use pipeline::{PricingRun, TrsPricer};
pub use valuation::{ExposureProfile, Percentiles, ValuationSummary};
