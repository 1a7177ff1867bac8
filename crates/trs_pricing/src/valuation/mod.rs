//! Valuation and exposure.
//!
//! - [`npv`]: discounting, per-path NPV and mark-to-market
//! - [`exposure`]: expected positive exposure profile
//! - [`statistics`]: mean, population standard deviation, percentiles
//! - [`summary`]: the aggregated [`ValuationSummary`]

pub mod exposure;
pub mod npv;
pub mod statistics;
pub mod summary;

pub use exposure::{expected_positive_exposure, ExposureProfile};
pub use npv::{
    calculate_npvs, ledger_npv, mark_to_market, mark_to_market_profile, period_discount_factor,
    present_value,
};
pub use statistics::{Percentiles, PERCENTILE_LEVELS};
pub use summary::{aggregate_results, ValuationSummary};
