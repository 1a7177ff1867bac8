//! Cross-path summary statistics.

use trs_core::NumericalError;

/// Percentile levels reported for the NPV distribution.
pub const PERCENTILE_LEVELS: [f64; 5] = [5.0, 25.0, 50.0, 75.0, 95.0];

/// NPV distribution percentiles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Percentiles {
    /// 5th percentile.
    #[cfg_attr(feature = "serde", serde(rename = "5th"))]
    pub p5: f64,
    /// 25th percentile.
    #[cfg_attr(feature = "serde", serde(rename = "25th"))]
    pub p25: f64,
    /// Median.
    #[cfg_attr(feature = "serde", serde(rename = "50th"))]
    pub p50: f64,
    /// 75th percentile.
    #[cfg_attr(feature = "serde", serde(rename = "75th"))]
    pub p75: f64,
    /// 95th percentile.
    #[cfg_attr(feature = "serde", serde(rename = "95th"))]
    pub p95: f64,
}

impl Percentiles {
    /// Computes all reported levels from unsorted values.
    ///
    /// # Errors
    ///
    /// `NumericalError::InsufficientData` if `values` is empty.
    pub fn from_values(values: &[f64]) -> Result<Self, NumericalError> {
        let sorted = sorted_copy(values, "percentiles")?;
        let [p5, p25, p50, p75, p95] = PERCENTILE_LEVELS.map(|q| percentile_sorted(&sorted, q));
        Ok(Self {
            p5,
            p25,
            p50,
            p75,
            p95,
        })
    }

    /// `(level, value)` pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> {
        PERCENTILE_LEVELS
            .into_iter()
            .zip([self.p5, self.p25, self.p50, self.p75, self.p95])
    }
}

/// Arithmetic mean.
///
/// # Errors
///
/// `NumericalError::InsufficientData` if `values` is empty.
pub fn mean(values: &[f64]) -> Result<f64, NumericalError> {
    if values.is_empty() {
        return Err(NumericalError::InsufficientData { what: "mean" });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by N).
///
/// # Errors
///
/// `NumericalError::InsufficientData` if `values` is empty.
///
/// # Examples
///
/// ```rust
/// use trs_pricing::valuation::statistics::population_std;
///
/// let std = population_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert!((std - 2.0).abs() < 1e-12);
/// ```
pub fn population_std(values: &[f64]) -> Result<f64, NumericalError> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Ok(var.sqrt())
}

/// Percentile `q` in `[0, 100]` by linear interpolation between order
/// statistics at rank `(n - 1) × q / 100`.
///
/// # Errors
///
/// `NumericalError::InsufficientData` if `values` is empty.
///
/// # Examples
///
/// ```rust
/// use trs_pricing::valuation::statistics::percentile;
///
/// let npvs = [-100.0, 0.0, 50.0, 100.0, 200.0];
/// assert_eq!(percentile(&npvs, 50.0).unwrap(), 50.0);
/// assert_eq!(percentile(&npvs, 5.0).unwrap(), -80.0);
/// ```
pub fn percentile(values: &[f64], q: f64) -> Result<f64, NumericalError> {
    let sorted = sorted_copy(values, "percentile")?;
    Ok(percentile_sorted(&sorted, q))
}

fn sorted_copy(values: &[f64], what: &'static str) -> Result<Vec<f64>, NumericalError> {
    if values.is_empty() {
        return Err(NumericalError::InsufficientData { what });
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    let rank = (sorted.len() - 1) as f64 * q.clamp(0.0, 100.0) / 100.0;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let weight = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_reference_npvs() {
        let npvs = [200.0, -100.0, 50.0, 0.0, 100.0];
        assert_eq!(mean(&npvs).unwrap(), 50.0);
        assert_eq!(percentile(&npvs, 50.0).unwrap(), 50.0);

        let p = Percentiles::from_values(&npvs).unwrap();
        assert_relative_eq!(p.p5, -80.0, epsilon = 1e-12);
        assert_relative_eq!(p.p25, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.p75, 100.0, epsilon = 1e-12);
        assert_relative_eq!(p.p95, 180.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_value() {
        let p = Percentiles::from_values(&[3.5]).unwrap();
        assert!(p.iter().all(|(_, v)| v == 3.5));
        assert_eq!(population_std(&[3.5]).unwrap(), 0.0);
    }

    #[test]
    fn test_empty_is_insufficient_data() {
        assert!(matches!(
            mean(&[]),
            Err(NumericalError::InsufficientData { .. })
        ));
        assert!(Percentiles::from_values(&[]).is_err());
        assert!(population_std(&[]).is_err());
    }

    #[test]
    fn test_population_not_sample() {
        // Sample std of [1, 3] is √2; population std is 1
        assert_relative_eq!(population_std(&[1.0, 3.0]).unwrap(), 1.0);
    }

    proptest! {
        #[test]
        fn prop_percentiles_monotone(values in prop::collection::vec(-1e6f64..1e6, 1..200)) {
            let p = Percentiles::from_values(&values).unwrap();
            prop_assert!(p.p5 <= p.p25);
            prop_assert!(p.p25 <= p.p50);
            prop_assert!(p.p50 <= p.p75);
            prop_assert!(p.p75 <= p.p95);

            let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(p.p5 >= lo && p.p95 <= hi);
        }
    }
}
