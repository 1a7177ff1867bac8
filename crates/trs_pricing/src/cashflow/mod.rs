//! Periodic cash flows of the two swap legs.
//!
//! Per period k on a path, with f payments per year:
//!
//! ```text
//! total_return = (S_k - S_{k-1}) / S_{k-1} × N + (q / f) × N
//! funding      = (r_eff / f) × N
//! net          = funding - total_return
//! ```
//!
//! Positive net is an inflow to the desk. The funding leg is a fixed
//! payment; depreciation of the reference asset is carried by the total
//! return leg only.

mod ledger;

pub use ledger::{CashFlowLedger, CashFlowRecord};

use rayon::prelude::*;
use tracing::debug;

use crate::mc::PriceScenarioSet;
use trs_core::{NumericalError, TradeTerms};

/// Trade terms that drive the leg cash flows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegTerms {
    /// Notional amount.
    pub notional: f64,
    /// Annual dividend yield.
    pub dividend_yield: f64,
    /// Benchmark rate plus funding spread.
    pub effective_funding_rate: f64,
    /// Settlement periods per year.
    pub payment_frequency: u32,
}

impl LegTerms {
    /// Leg terms of a resolved trade.
    pub fn from_terms(terms: &TradeTerms) -> Self {
        Self {
            notional: terms.notional(),
            dividend_yield: terms.dividend_yield(),
            effective_funding_rate: terms.effective_funding_rate(),
            payment_frequency: terms.payment_frequency(),
        }
    }

    /// Fixed funding payment per period.
    #[inline]
    pub fn funding_flow(&self) -> f64 {
        self.effective_funding_rate / self.payment_frequency as f64 * self.notional
    }

    /// Dividend pass-through per period.
    #[inline]
    pub fn dividend_flow(&self) -> f64 {
        self.dividend_yield / self.payment_frequency as f64 * self.notional
    }
}

/// Builds the ledger for one price path.
///
/// `path_index` is only used to locate a failure.
///
/// # Errors
///
/// `NumericalError::NonPositivePrice` if a period starts at a price ≤ 0.
///
/// # Examples
///
/// ```rust
/// use trs_pricing::cashflow::{calculate_path_cash_flows, LegTerms};
///
/// let legs = LegTerms {
///     notional: 1_000_000.0,
///     dividend_yield: 0.0,
///     effective_funding_rate: 0.065,
///     payment_frequency: 4,
/// };
/// let ledger = calculate_path_cash_flows(&[100.0, 100.0], 0, &legs).unwrap();
/// let record = &ledger.records()[0];
///
/// assert_eq!(record.total_return_leg_flow, 0.0);
/// assert_eq!(record.funding_leg_flow, 16_250.0);
/// assert_eq!(record.net_cash_flow, 16_250.0);
/// ```
pub fn calculate_path_cash_flows(
    path: &[f64],
    path_index: usize,
    legs: &LegTerms,
) -> Result<CashFlowLedger, NumericalError> {
    let funding = legs.funding_flow();
    let dividend = legs.dividend_flow();

    let records = path
        .windows(2)
        .enumerate()
        .map(|(k, w)| {
            let (start, end) = (w[0], w[1]);
            if start <= 0.0 || start.is_nan() {
                return Err(NumericalError::NonPositivePrice {
                    path: path_index,
                    period: k + 1,
                    price: start,
                });
            }
            let total_return = (end - start) / start * legs.notional + dividend;
            Ok(CashFlowRecord {
                period: k + 1,
                period_start_price: start,
                period_end_price: end,
                total_return_leg_flow: total_return,
                funding_leg_flow: funding,
                net_cash_flow: funding - total_return,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CashFlowLedger::new(records))
}

/// Builds one ledger per simulated path, in path order.
///
/// # Errors
///
/// `NumericalError::NonPositivePrice` if any period starts at a price ≤ 0.
pub fn calculate_cash_flows(
    scenarios: &PriceScenarioSet,
    legs: &LegTerms,
) -> Result<Vec<CashFlowLedger>, NumericalError> {
    debug!(
        num_paths = scenarios.num_paths(),
        num_periods = scenarios.num_periods(),
        funding_flow = legs.funding_flow(),
        "calculating leg cash flows"
    );

    (0..scenarios.num_paths())
        .into_par_iter()
        .map(|i| calculate_path_cash_flows(scenarios.path(i), i, legs))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn legs() -> LegTerms {
        LegTerms {
            notional: 1_000_000.0,
            dividend_yield: 0.02,
            effective_funding_rate: 0.065,
            payment_frequency: 4,
        }
    }

    #[test]
    fn test_rising_price_period() {
        let ledger = calculate_path_cash_flows(&[100.0, 110.0, 99.0], 0, &legs()).unwrap();
        assert_eq!(ledger.len(), 2);

        let first = &ledger.records()[0];
        assert_eq!(first.period, 1);
        // 10% return plus 0.5% dividend
        assert_relative_eq!(first.total_return_leg_flow, 105_000.0, epsilon = 1e-6);
        assert_relative_eq!(first.net_cash_flow, 16_250.0 - 105_000.0, epsilon = 1e-6);

        let second = &ledger.records()[1];
        assert_eq!(second.period, 2);
        assert_eq!(second.period_start_price, 110.0);
        assert_relative_eq!(second.total_return_leg_flow, -95_000.0, epsilon = 1e-6);
        // Funding leg stays fixed when the asset falls
        assert_relative_eq!(second.funding_leg_flow, 16_250.0, epsilon = 1e-9);
    }

    #[test]
    fn test_non_positive_start_price() {
        let err = calculate_path_cash_flows(&[100.0, 0.0, 50.0], 7, &legs()).unwrap_err();
        assert_eq!(
            err,
            NumericalError::NonPositivePrice {
                path: 7,
                period: 2,
                price: 0.0
            }
        );
    }

    #[test]
    fn test_single_column_gives_empty_ledger() {
        let ledger = calculate_path_cash_flows(&[100.0], 0, &legs()).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_return_leg_total(), 0.0);
    }
}
