//! Per-path cash-flow ledger.

/// Cash flows of one settlement period on one path.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CashFlowRecord {
    /// 1-based period index.
    pub period: usize,
    /// Reference price at the start of the period.
    pub period_start_price: f64,
    /// Reference price at the end of the period.
    pub period_end_price: f64,
    /// Total return leg: price return plus dividend pass-through.
    pub total_return_leg_flow: f64,
    /// Funding leg: fixed effective-rate payment.
    pub funding_leg_flow: f64,
    /// `funding_leg_flow - total_return_leg_flow`.
    pub net_cash_flow: f64,
}

/// Ordered cash-flow records of one path, periods `1..=n`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CashFlowLedger {
    records: Vec<CashFlowRecord>,
}

impl CashFlowLedger {
    /// Wraps records already in period order.
    pub fn new(records: Vec<CashFlowRecord>) -> Self {
        debug_assert!(records.iter().enumerate().all(|(i, r)| r.period == i + 1));
        Self { records }
    }

    /// All records.
    #[inline]
    pub fn records(&self) -> &[CashFlowRecord] {
        &self.records
    }

    /// Number of periods.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the ledger has no periods.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Net cash flows in period order.
    pub fn net_flows(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.net_cash_flow)
    }

    /// Funding-leg flows in period order.
    pub fn funding_flows(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.funding_leg_flow)
    }

    /// Sum of total-return-leg flows.
    pub fn total_return_leg_total(&self) -> f64 {
        self.records.iter().map(|r| r.total_return_leg_flow).sum()
    }

    /// Sum of funding-leg flows.
    pub fn funding_leg_total(&self) -> f64 {
        self.funding_flows().sum()
    }
}
