//! # trs_risk: Trade Decision Engine (Layer 4)
//!
//! Turns a [`ValuationSummary`](trs_pricing::ValuationSummary) into an
//! approve / review / reject verdict with quantitative remediation:
//! a funding spread increase, a notional reduction or a collateral
//! requirement.
//!
//! VaR and EPE limits scale with the trade's volatility and tenor so that
//! riskier trades are judged against proportionally wider bands; the NPV
//! hurdle is fixed.
//!
//! ```rust
//! use trs_risk::{DecisionContext, DecisionEngine, Issue, Status, ValuationInputs};
//!
//! let engine = DecisionEngine::default();
//! let context = DecisionContext {
//!     notional: 1_000_000.0,
//!     tenor: 1.0,
//!     volatility: 0.25,
//!     funding_spread: 0.015,
//! };
//! let inputs = ValuationInputs { npv_mean: 3_000.0, npv_p5: -100_000.0, peak_epe: 20_000.0 };
//!
//! let result = engine.evaluate_inputs(&inputs, &context);
//! assert_eq!(result.overall_status, Status::Red);
//! assert!(result.has_issue(Issue::NpvTooLow));
//! ```

#![warn(missing_docs)]

pub mod decision;

pub use decision::{
    AppliedThresholds, DecisionContext, DecisionEngine, DecisionResult, DecisionThresholds, Issue,
    MetricDirection, ScaleFactors, Status, ThresholdBand, ValuationInputs,
};
