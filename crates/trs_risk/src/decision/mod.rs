//! Trade decision engine.
//!
//! Three metrics, each as a fraction of notional, drive the verdict:
//!
//! | Metric | Definition | Direction |
//! |--------|------------|-----------|
//! | NPV | mean NPV | higher is better |
//! | VaR | \|5th percentile NPV\| | lower is better |
//! | EPE | peak EPE | lower is better |
//!
//! The overall status is the worst of the three. Each non-green metric
//! raises an [`Issue`] with a matching remediation in [`Adjustments`].

mod engine;
mod result;
mod thresholds;

pub use engine::{key_metrics, DecisionContext, DecisionEngine, ValuationInputs};
pub use result::{
    Adjustments, CollateralRequirement, DecisionResult, Issue, KeyMetrics, MetricStatuses,
    NotionalReduction, SpreadAdjustment, Status,
};
pub use thresholds::{
    AppliedThresholds, DecisionThresholds, MetricDirection, ScaleFactors, ThresholdBand,
};
