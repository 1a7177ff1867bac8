//! Valuation summary aggregated over all paths.

use super::exposure::{common_length, ExposureProfile};
use super::npv::present_value;
use super::statistics::{mean, population_std, Percentiles};
use crate::cashflow::CashFlowLedger;
use trs_core::{NumericalError, TradeTerms};

/// Aggregated result of a pricing run.
///
/// Recomputed on every run; the trade terms are echoed for downstream
/// consumers such as the decision engine and reports.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValuationSummary {
    /// Mean NPV across paths.
    pub npv_mean: f64,
    /// Population standard deviation of NPV.
    pub npv_std: f64,
    /// NPV percentiles.
    pub npv_percentiles: Percentiles,
    /// EPE per period.
    pub epe_profile: Vec<f64>,
    /// Period end times in years, aligned with `epe_profile`.
    #[cfg_attr(feature = "serde", serde(rename = "epe_dates"))]
    pub epe_times: Vec<f64>,
    /// Maximum of the EPE profile.
    pub peak_epe: f64,
    /// First 1-based period attaining `peak_epe`; 0 if there are no periods.
    pub peak_epe_period: usize,
    /// Mean net cash flow per period.
    pub mean_periodic_net_cash_flows: Vec<f64>,
    /// Mean over paths of the summed total-return-leg flows.
    pub total_return_leg_total: f64,
    /// Mean over paths of the summed funding-leg flows.
    pub funding_leg_total: f64,
    /// Shares-equivalent exposure, `notional / initial_price`.
    pub delta_exposure: f64,
    /// Mean over paths of the discounted funding leg.
    pub funding_rate_exposure: f64,
    /// Number of simulated paths.
    pub num_simulations: usize,
    /// Number of periods per path.
    pub num_periods: usize,
    /// Trade terms the run was priced with.
    pub terms: TradeTerms,
}

impl ValuationSummary {
    /// Time in years of the peak EPE period, 0 if there are no periods.
    pub fn peak_epe_time(&self) -> f64 {
        self.peak_epe_period
            .checked_sub(1)
            .and_then(|i| self.epe_times.get(i))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Aggregates per-path results into a [`ValuationSummary`].
///
/// `npvs[i]` must be the NPV of `ledgers[i]`.
///
/// # Errors
///
/// - `NumericalError::InsufficientData` if there are no paths
/// - `NumericalError::LengthMismatch` if ledger lengths differ or the NPV
///   count does not match the ledger count
pub fn aggregate_results(
    terms: &TradeTerms,
    ledgers: &[CashFlowLedger],
    npvs: &[f64],
    exposure: &ExposureProfile,
) -> Result<ValuationSummary, NumericalError> {
    let num_periods = common_length(ledgers)?;
    if npvs.len() != ledgers.len() {
        return Err(NumericalError::LengthMismatch {
            what: "npv list",
            expected: ledgers.len(),
            actual: npvs.len(),
        });
    }
    if exposure.len() != num_periods {
        return Err(NumericalError::LengthMismatch {
            what: "exposure profile",
            expected: num_periods,
            actual: exposure.len(),
        });
    }

    let n = ledgers.len() as f64;
    let mean_periodic_net_cash_flows = (0..num_periods)
        .map(|p| ledgers.iter().map(|l| l.records()[p].net_cash_flow).sum::<f64>() / n)
        .collect();

    let total_return_leg_total =
        ledgers.iter().map(|l| l.total_return_leg_total()).sum::<f64>() / n;
    let funding_leg_total = ledgers.iter().map(|l| l.funding_leg_total()).sum::<f64>() / n;

    let funding_rate_exposure = ledgers
        .iter()
        .map(|l| present_value(l.funding_flows(), terms.benchmark_rate(), terms.payment_frequency()))
        .sum::<f64>()
        / n;

    let (peak_epe, peak_epe_period) = exposure.peak();

    Ok(ValuationSummary {
        npv_mean: mean(npvs)?,
        npv_std: population_std(npvs)?,
        npv_percentiles: Percentiles::from_values(npvs)?,
        epe_profile: exposure.epe().to_vec(),
        epe_times: exposure.times().to_vec(),
        peak_epe,
        peak_epe_period,
        mean_periodic_net_cash_flows,
        total_return_leg_total,
        funding_leg_total,
        delta_exposure: terms.notional() / terms.initial_price(),
        funding_rate_exposure,
        num_simulations: ledgers.len(),
        num_periods,
        terms: terms.clone(),
    })
}
