//! Decision outcome types.

use std::fmt;

use serde::Serialize;

use super::thresholds::{AppliedThresholds, ScaleFactors};

/// Traffic-light status, ordered from best to worst.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Within the green threshold.
    Green,
    /// Between the green and yellow thresholds.
    Yellow,
    /// Outside the yellow threshold.
    Red,
}

impl Status {
    /// Lower-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Green => "green",
            Status::Yellow => "yellow",
            Status::Red => "red",
        }
    }

    /// Verdict shown in reports.
    pub fn verdict(&self) -> &'static str {
        match self {
            Status::Green => "APPROVED",
            Status::Yellow => "REVIEW REQUIRED",
            Status::Red => "NOT APPROVED",
        }
    }

    /// Worst of the given statuses, green if there are none.
    pub fn worst<I: IntoIterator<Item = Status>>(statuses: I) -> Status {
        statuses.into_iter().max().unwrap_or(Status::Green)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Problem flagged for a non-green metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Issue {
    /// NPV below the green hurdle.
    NpvTooLow,
    /// VaR above the scaled green limit.
    VarTooHigh,
    /// Peak EPE above the scaled green limit.
    EpeTooHigh,
}

impl Issue {
    /// Tag name, e.g. `npv_too_low`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Issue::NpvTooLow => "npv_too_low",
            Issue::VarTooHigh => "var_too_high",
            Issue::EpeTooHigh => "epe_too_high",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Issue::NpvTooLow => "NPV below acceptable threshold",
            Issue::VarTooHigh => "VaR exceeds acceptable limit",
            Issue::EpeTooHigh => "EPE exceeds acceptable limit",
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key metrics as fractions of notional.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct KeyMetrics {
    /// Mean NPV / notional.
    pub npv_pct: f64,
    /// |5th percentile NPV| / notional.
    pub var_pct: f64,
    /// Peak EPE / notional.
    pub epe_pct: f64,
}

/// Per-metric statuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MetricStatuses {
    /// NPV status.
    pub npv: Status,
    /// VaR status.
    pub var: Status,
    /// EPE status.
    pub epe: Status,
}

impl MetricStatuses {
    /// Worst of the three.
    pub fn overall(&self) -> Status {
        Status::worst([self.npv, self.var, self.epe])
    }
}

/// Funding spread increase that would lift NPV to the green hurdle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SpreadAdjustment {
    /// Spread change in basis points.
    pub delta_bps: f64,
    /// Recommended spread, never negative.
    pub new_spread: f64,
}

/// Notional cut that would bring VaR to the green limit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NotionalReduction {
    /// Reduction in percent, within `[0, 100]`.
    pub reduction_pct: f64,
    /// Recommended notional.
    pub new_notional: f64,
}

/// Collateral that would cover EPE above the green limit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CollateralRequirement {
    /// Collateral in percent of notional.
    pub collateral_pct: f64,
    /// Collateral amount.
    pub collateral_amount: f64,
}

/// Remediation suggestions keyed by type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Adjustments {
    /// Present when NPV is not green.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread_adjustment: Option<SpreadAdjustment>,
    /// Present when VaR is not green and positive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notional_reduction: Option<NotionalReduction>,
    /// Present when EPE is not green.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collateral_requirement: Option<CollateralRequirement>,
}

impl Adjustments {
    /// Returns `true` if nothing is recommended.
    pub fn is_empty(&self) -> bool {
        self.spread_adjustment.is_none()
            && self.notional_reduction.is_none()
            && self.collateral_requirement.is_none()
    }
}

/// Outcome of evaluating a trade.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecisionResult {
    /// Key metrics.
    pub metrics: KeyMetrics,
    /// Per-metric statuses.
    pub statuses: MetricStatuses,
    /// Worst per-metric status.
    pub overall_status: Status,
    /// Issues in NPV, VaR, EPE order.
    pub issues: Vec<Issue>,
    /// Remediation suggestions.
    pub adjustments: Adjustments,
    /// Bands used, after scaling.
    pub thresholds: AppliedThresholds,
    /// Scale factors applied to the VaR and EPE bands.
    pub scale_factors: ScaleFactors,
}

impl DecisionResult {
    /// Returns `true` if the trade is approved as is.
    pub fn is_approved(&self) -> bool {
        self.overall_status == Status::Green
    }

    /// Returns `true` if `issue` was flagged.
    pub fn has_issue(&self, issue: Issue) -> bool {
        self.issues.contains(&issue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering() {
        assert!(Status::Green < Status::Yellow);
        assert!(Status::Yellow < Status::Red);
        assert_eq!(
            Status::worst([Status::Green, Status::Red, Status::Yellow]),
            Status::Red
        );
        assert_eq!(Status::worst([]), Status::Green);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Status::Yellow.verdict(), "REVIEW REQUIRED");
        assert_eq!(Issue::VarTooHigh.to_string(), "var_too_high");
        assert_eq!(Status::Red.to_string(), "red");
    }
}
