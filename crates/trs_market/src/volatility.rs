//! Realised volatility estimates from closing prices.

use trs_core::defaults::TRADING_DAYS_PER_YEAR;

/// Minimum number of daily returns required for an estimate.
pub const MIN_RETURNS: usize = 10;

/// Daily close-to-close log returns, skipping pairs with a non-positive close.
pub fn log_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] > 0.0 && w[1] > 0.0)
        .map(|w| (w[1] / w[0]).ln())
        .filter(|r| r.is_finite())
        .collect()
}

/// Annualised historical volatility over the last `lookback_days` returns.
///
/// Uses the sample standard deviation (n − 1) of daily log returns scaled by
/// √252. Returns `None` when fewer than [`MIN_RETURNS`] returns are available.
///
/// # Examples
///
/// ```
/// use trs_market::volatility::historical_volatility;
///
/// // Alternating +1% / -1% moves
/// let mut closes = vec![100.0];
/// for i in 0..40 {
///     let last = *closes.last().unwrap();
///     closes.push(if i % 2 == 0 { last * 1.01 } else { last / 1.01 });
/// }
/// let vol = historical_volatility(&closes, 252).unwrap();
/// assert!(vol > 0.15 && vol < 0.17);
///
/// assert!(historical_volatility(&closes[..5], 252).is_none());
/// ```
pub fn historical_volatility(closes: &[f64], lookback_days: usize) -> Option<f64> {
    let returns = log_returns(closes);
    let start = returns.len().saturating_sub(lookback_days);
    let window = &returns[start..];

    if window.len() < MIN_RETURNS {
        return None;
    }

    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);

    Some(variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt())
}
