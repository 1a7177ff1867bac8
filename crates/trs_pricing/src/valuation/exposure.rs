//! Expected positive exposure profile.
//!
//! EPE(p) = E[max(MTM(p), 0)], with every path weighted equally.

use rayon::prelude::*;
use tracing::debug;

use super::npv::mark_to_market_profile;
use crate::cashflow::CashFlowLedger;
use trs_core::NumericalError;

/// EPE per period paired with the period time offsets in years.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExposureProfile {
    epe: Vec<f64>,
    times: Vec<f64>,
}

impl ExposureProfile {
    /// EPE for periods `1..=n`, never negative.
    #[inline]
    pub fn epe(&self) -> &[f64] {
        &self.epe
    }

    /// Period end times `p / f` in years.
    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of periods.
    #[inline]
    pub fn len(&self) -> usize {
        self.epe.len()
    }

    /// Returns `true` if the profile has no periods.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.epe.is_empty()
    }

    /// Peak EPE and the first 1-based period attaining it.
    ///
    /// An empty profile peaks at zero in period 0.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trs_pricing::valuation::ExposureProfile;
    ///
    /// let profile = ExposureProfile::from_parts(vec![1.0, 3.0, 3.0, 2.0], 4);
    /// assert_eq!(profile.peak(), (3.0, 2));
    /// assert_eq!(ExposureProfile::default().peak(), (0.0, 0));
    /// ```
    pub fn peak(&self) -> (f64, usize) {
        let mut best = (0.0, 0);
        for (i, &value) in self.epe.iter().enumerate() {
            if best.1 == 0 || value > best.0 {
                best = (value, i + 1);
            }
        }
        best
    }

    /// Builds a profile from EPE values, deriving the time grid.
    pub fn from_parts(epe: Vec<f64>, payment_frequency: u32) -> Self {
        let f = payment_frequency as f64;
        let times = (1..=epe.len()).map(|p| p as f64 / f).collect();
        Self { epe, times }
    }
}

/// Checks that ledgers exist and share one length, returning that length.
pub(crate) fn common_length(ledgers: &[CashFlowLedger]) -> Result<usize, NumericalError> {
    let first = ledgers
        .first()
        .ok_or(NumericalError::InsufficientData {
            what: "cash flow ledgers",
        })?;
    let expected = first.len();
    if let Some(bad) = ledgers.iter().find(|l| l.len() != expected) {
        return Err(NumericalError::LengthMismatch {
            what: "cash flow ledger",
            expected,
            actual: bad.len(),
        });
    }
    Ok(expected)
}

/// Computes the EPE profile across all paths.
///
/// # Errors
///
/// - `NumericalError::InsufficientData` if `ledgers` is empty
/// - `NumericalError::LengthMismatch` if ledgers differ in length
pub fn expected_positive_exposure(
    ledgers: &[CashFlowLedger],
    benchmark_rate: f64,
    payment_frequency: u32,
) -> Result<ExposureProfile, NumericalError> {
    let num_periods = common_length(ledgers)?;
    debug!(
        num_paths = ledgers.len(),
        num_periods, "computing exposure profile"
    );

    // Per-path profiles first so that column sums run in path order
    let mtm: Vec<Vec<f64>> = ledgers
        .par_iter()
        .map(|l| mark_to_market_profile(l, benchmark_rate, payment_frequency))
        .collect();

    let n = mtm.len() as f64;
    let epe = (0..num_periods)
        .into_par_iter()
        .map(|p| mtm.iter().map(|path| path[p].max(0.0)).sum::<f64>() / n)
        .collect();

    Ok(ExposureProfile::from_parts(epe, payment_frequency))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cashflow::CashFlowRecord;
    use approx::assert_relative_eq;

    fn ledger(net: &[f64]) -> CashFlowLedger {
        CashFlowLedger::new(
            net.iter()
                .enumerate()
                .map(|(i, &n)| CashFlowRecord {
                    period: i + 1,
                    period_start_price: 100.0,
                    period_end_price: 100.0,
                    total_return_leg_flow: -n,
                    funding_leg_flow: 0.0,
                    net_cash_flow: n,
                })
                .collect(),
        )
    }

    #[test]
    fn test_epe_floors_negative_mtm() {
        let ledgers = vec![ledger(&[10.0, 10.0]), ledger(&[-50.0, -50.0])];
        let profile = expected_positive_exposure(&ledgers, 0.0, 4).unwrap();

        // Path 1 MTM: [20, 10]; path 2 MTM negative throughout
        assert_relative_eq!(profile.epe()[0], 10.0);
        assert_relative_eq!(profile.epe()[1], 5.0);
        assert_eq!(profile.times(), &[0.25, 0.5]);
        assert_eq!(profile.peak(), (10.0, 1));
    }

    #[test]
    fn test_empty_ledgers_rejected() {
        assert_eq!(
            expected_positive_exposure(&[], 0.05, 4).unwrap_err(),
            NumericalError::InsufficientData {
                what: "cash flow ledgers"
            }
        );
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let ledgers = vec![ledger(&[1.0, 2.0]), ledger(&[1.0])];
        assert_eq!(
            expected_positive_exposure(&ledgers, 0.05, 4).unwrap_err(),
            NumericalError::LengthMismatch {
                what: "cash flow ledger",
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_zero_period_ledgers_give_empty_profile() {
        let ledgers = vec![ledger(&[]), ledger(&[])];
        let profile = expected_positive_exposure(&ledgers, 0.05, 4).unwrap();
        assert!(profile.is_empty());
        assert_eq!(profile.peak(), (0.0, 0));
    }

    #[test]
    fn test_all_zero_exposure_peaks_in_first_period() {
        let profile = ExposureProfile::from_parts(vec![0.0, 0.0, 0.0], 12);
        assert_eq!(profile.peak(), (0.0, 1));
    }
}
