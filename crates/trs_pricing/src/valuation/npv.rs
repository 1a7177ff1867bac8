//! Discounting of net cash flows.
//!
//! The periodic rate is `benchmark_rate / payment_frequency`, compounded per
//! period; period k is discounted by `(1 + r/f)^(-k)`.

use rayon::prelude::*;

use crate::cashflow::CashFlowLedger;

/// One-period discount factor `1 / (1 + r/f)`.
#[inline]
pub fn period_discount_factor(benchmark_rate: f64, payment_frequency: u32) -> f64 {
    1.0 / (1.0 + benchmark_rate / payment_frequency as f64)
}

/// Present value of flows paid at periods 1, 2, 3, ...
///
/// An empty sequence is worth exactly zero.
///
/// # Examples
///
/// ```rust
/// use trs_pricing::valuation::present_value;
///
/// assert_eq!(present_value([0.0; 8], 0.05, 4), 0.0);
/// assert_eq!(present_value(std::iter::empty(), 0.05, 4), 0.0);
///
/// // One period at 4% annual, paid quarterly
/// let pv = present_value([101.0], 0.04, 4);
/// assert!((pv - 100.0).abs() < 1e-12);
/// ```
pub fn present_value<I>(flows: I, benchmark_rate: f64, payment_frequency: u32) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let d = period_discount_factor(benchmark_rate, payment_frequency);
    let mut discount = 1.0;
    let mut pv = 0.0;
    for flow in flows {
        discount *= d;
        pv += flow * discount;
    }
    pv
}

/// NPV of a path: discounted sum of its net cash flows.
#[inline]
pub fn ledger_npv(ledger: &CashFlowLedger, benchmark_rate: f64, payment_frequency: u32) -> f64 {
    present_value(ledger.net_flows(), benchmark_rate, payment_frequency)
}

/// NPV of every ledger, in path order.
pub fn calculate_npvs(
    ledgers: &[CashFlowLedger],
    benchmark_rate: f64,
    payment_frequency: u32,
) -> Vec<f64> {
    ledgers
        .par_iter()
        .map(|l| ledger_npv(l, benchmark_rate, payment_frequency))
        .collect()
}

/// Mark-to-market value of a path as of `period` (1-based).
///
/// Present value of the net flows from `period` to maturity inclusive, with
/// the discount exponent restarting at 1 on `period`. Zero when `period`
/// lies past the last period. Period 0 is treated as period 1.
pub fn mark_to_market(
    ledger: &CashFlowLedger,
    benchmark_rate: f64,
    payment_frequency: u32,
    period: usize,
) -> f64 {
    let skip = period.saturating_sub(1);
    if skip >= ledger.len() {
        return 0.0;
    }
    present_value(ledger.net_flows().skip(skip), benchmark_rate, payment_frequency)
}

/// Mark-to-market value at every period `1..=n` of a path.
///
/// Computed by backward recursion `MTM(p) = d × (cf_p + MTM(p+1))`, which
/// equals [`mark_to_market`] at each period.
pub fn mark_to_market_profile(
    ledger: &CashFlowLedger,
    benchmark_rate: f64,
    payment_frequency: u32,
) -> Vec<f64> {
    let d = period_discount_factor(benchmark_rate, payment_frequency);
    let mut profile = vec![0.0; ledger.len()];
    let mut next = 0.0;
    for (slot, record) in profile.iter_mut().zip(ledger.records()).rev() {
        next = d * (record.net_cash_flow + next);
        *slot = next;
    }
    profile
}
