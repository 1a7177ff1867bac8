//! Trade evaluation against volatility/tenor-scaled thresholds.

use tracing::info;

use super::result::{
    Adjustments, CollateralRequirement, DecisionResult, Issue, KeyMetrics, MetricStatuses,
    NotionalReduction, SpreadAdjustment, Status,
};
use super::thresholds::{AppliedThresholds, DecisionThresholds};
use trs_core::{TradeTerms, ValidationError};
use trs_pricing::ValuationSummary;

/// Trade attributes the decision depends on besides the valuation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecisionContext {
    /// Notional amount.
    pub notional: f64,
    /// Tenor in years.
    pub tenor: f64,
    /// Annualised volatility.
    pub volatility: f64,
    /// Current funding spread.
    pub funding_spread: f64,
}

impl DecisionContext {
    /// Context of a resolved trade.
    pub fn from_terms(terms: &TradeTerms) -> Self {
        Self {
            notional: terms.notional(),
            tenor: terms.tenor(),
            volatility: terms.volatility(),
            funding_spread: terms.funding_spread(),
        }
    }
}

/// Valuation figures the decision consumes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValuationInputs {
    /// Mean NPV.
    pub npv_mean: f64,
    /// 5th percentile NPV.
    pub npv_p5: f64,
    /// Peak EPE.
    pub peak_epe: f64,
}

impl ValuationInputs {
    /// Inputs taken from a valuation summary.
    pub fn from_summary(summary: &ValuationSummary) -> Self {
        Self {
            npv_mean: summary.npv_mean,
            npv_p5: summary.npv_percentiles.p5,
            peak_epe: summary.peak_epe,
        }
    }
}

/// Maps valuation results to a traffic-light decision with remediation.
///
/// Stateless: the same inputs always give the same result.
///
/// # Examples
///
/// ```rust
/// use trs_risk::{DecisionContext, DecisionEngine, Status, ValuationInputs};
///
/// let engine = DecisionEngine::default();
/// let context = DecisionContext {
///     notional: 1_000_000.0,
///     tenor: 1.0,
///     volatility: 0.25,
///     funding_spread: 0.015,
/// };
/// let result = engine.evaluate_inputs(
///     &ValuationInputs { npv_mean: 12_000.0, npv_p5: -100_000.0, peak_epe: 20_000.0 },
///     &context,
/// );
///
/// assert_eq!(result.overall_status, Status::Green);
/// assert!(result.issues.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct DecisionEngine {
    thresholds: DecisionThresholds,
}

impl DecisionEngine {
    /// Creates an engine with validated thresholds.
    ///
    /// # Errors
    ///
    /// `ValidationError` if the thresholds are invalid.
    pub fn new(thresholds: DecisionThresholds) -> Result<Self, ValidationError> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    /// Base thresholds.
    pub fn thresholds(&self) -> &DecisionThresholds {
        &self.thresholds
    }

    /// Evaluates a pricing run's summary.
    pub fn evaluate(&self, summary: &ValuationSummary) -> DecisionResult {
        self.evaluate_inputs(
            &ValuationInputs::from_summary(summary),
            &DecisionContext::from_terms(&summary.terms),
        )
    }

    /// Evaluates raw valuation figures for a trade.
    pub fn evaluate_inputs(
        &self,
        inputs: &ValuationInputs,
        context: &DecisionContext,
    ) -> DecisionResult {
        let metrics = key_metrics(inputs, context.notional);
        let scale_factors = self
            .thresholds
            .scale_factors(context.volatility, context.tenor);
        let applied = self.thresholds.applied(scale_factors);

        let statuses = MetricStatuses {
            npv: applied.npv.classify(metrics.npv_pct),
            var: applied.var.classify(metrics.var_pct),
            epe: applied.epe.classify(metrics.epe_pct),
        };
        let overall_status = statuses.overall();

        let issues: Vec<Issue> = [
            (statuses.npv, Issue::NpvTooLow),
            (statuses.var, Issue::VarTooHigh),
            (statuses.epe, Issue::EpeTooHigh),
        ]
        .into_iter()
        .filter(|(status, _)| *status != Status::Green)
        .map(|(_, issue)| issue)
        .collect();

        let adjustments = adjustments(&issues, &metrics, inputs, context, &applied);

        info!(
            npv_pct = metrics.npv_pct,
            var_pct = metrics.var_pct,
            epe_pct = metrics.epe_pct,
            overall = overall_status.as_str(),
            issues = issues.len(),
            "trade evaluated"
        );

        DecisionResult {
            metrics,
            statuses,
            overall_status,
            issues,
            adjustments,
            thresholds: applied,
            scale_factors,
        }
    }
}

/// NPV, VaR and peak EPE as fractions of notional; zero if notional is not positive.
pub fn key_metrics(inputs: &ValuationInputs, notional: f64) -> KeyMetrics {
    if notional <= 0.0 {
        return KeyMetrics {
            npv_pct: 0.0,
            var_pct: 0.0,
            epe_pct: 0.0,
        };
    }
    KeyMetrics {
        npv_pct: inputs.npv_mean / notional,
        var_pct: inputs.npv_p5.abs() / notional,
        epe_pct: inputs.peak_epe / notional,
    }
}

fn adjustments(
    issues: &[Issue],
    metrics: &KeyMetrics,
    inputs: &ValuationInputs,
    context: &DecisionContext,
    applied: &AppliedThresholds,
) -> Adjustments {
    let notional = context.notional;
    let mut out = Adjustments::default();

    if issues.contains(&Issue::NpvTooLow) && notional > 0.0 && context.tenor > 0.0 {
        let target = applied.npv.green * notional;
        let delta_bps = (target - inputs.npv_mean) / (notional * context.tenor) * 10_000.0;
        out.spread_adjustment = Some(SpreadAdjustment {
            delta_bps,
            new_spread: (context.funding_spread + delta_bps / 10_000.0).max(0.0),
        });
    }

    if issues.contains(&Issue::VarTooHigh) {
        let current = metrics.var_pct * notional;
        if current > 0.0 {
            let target = applied.var.green * notional;
            let reduction_pct = ((current - target) / current * 100.0).clamp(0.0, 100.0);
            out.notional_reduction = Some(NotionalReduction {
                reduction_pct,
                new_notional: notional * (1.0 - reduction_pct / 100.0),
            });
        }
    }

    if issues.contains(&Issue::EpeTooHigh) && notional > 0.0 {
        let current = metrics.epe_pct * notional;
        let target = applied.epe.green * notional;
        let collateral_pct = ((current - target) / notional * 100.0).max(0.0);
        out.collateral_requirement = Some(CollateralRequirement {
            collateral_pct,
            collateral_amount: notional * collateral_pct / 100.0,
        });
    }

    out
}
