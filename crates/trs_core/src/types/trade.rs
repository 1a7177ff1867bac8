//! Resolved trade terms.
//!
//! [`TradeTerms`] is produced once per pricing request by the resolution step
//! (user overrides merged with market data) and is immutable afterwards. Use
//! [`TradeTermsBuilder`] to construct instances; every field is validated at
//! build time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ValidationError;
use crate::validation::{
    ensure_non_negative, ensure_positive, ensure_positive_count, require,
};

/// Tolerance applied before flooring `tenor × payment_frequency`.
///
/// Keeps products such as `0.29 × 100` from losing a period to rounding.
const PERIOD_COUNT_EPSILON: f64 = 1e-9;

/// Side of the swap taken by the pricing desk.
///
/// # Examples
///
/// ```
/// use trs_core::types::DeskPosition;
///
/// let pos: DeskPosition = "PAYER".parse().unwrap();
/// assert_eq!(pos, DeskPosition::Payer);
/// assert_eq!(DeskPosition::default(), DeskPosition::Receiver);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeskPosition {
    /// Desk pays the total return of the reference asset.
    Payer,
    /// Desk receives the total return of the reference asset.
    #[default]
    Receiver,
}

impl DeskPosition {
    /// Returns the lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeskPosition::Payer => "payer",
            DeskPosition::Receiver => "receiver",
        }
    }
}

impl FromStr for DeskPosition {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "payer" => Ok(DeskPosition::Payer),
            "receiver" => Ok(DeskPosition::Receiver),
            _ => Err(ValidationError::InvalidDeskPosition(s.to_string())),
        }
    }
}

impl fmt::Display for DeskPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved economic terms of a total return swap.
///
/// # Invariants
///
/// - `notional`, `tenor`, `initial_price`, `volatility` are finite and > 0
/// - `dividend_yield`, `benchmark_rate`, `funding_spread` are finite and >= 0
/// - `payment_frequency` and `num_simulations` are >= 1
/// - `ticker` is trimmed, upper-cased and non-empty
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TradeTerms {
    ticker: String,
    notional: f64,
    tenor: f64,
    payment_frequency: u32,
    num_simulations: usize,
    initial_price: f64,
    dividend_yield: f64,
    volatility: f64,
    benchmark_rate: f64,
    funding_spread: f64,
    effective_funding_rate: f64,
    desk_position: DeskPosition,
}

impl TradeTerms {
    /// Creates a new builder for the given reference asset.
    #[inline]
    pub fn builder(ticker: impl Into<String>) -> TradeTermsBuilder {
        TradeTermsBuilder::new(ticker)
    }

    /// Reference asset identifier.
    #[inline]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Notional amount in currency units.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Tenor in years.
    #[inline]
    pub fn tenor(&self) -> f64 {
        self.tenor
    }

    /// Settlement periods per year.
    #[inline]
    pub fn payment_frequency(&self) -> u32 {
        self.payment_frequency
    }

    /// Number of Monte Carlo paths.
    #[inline]
    pub fn num_simulations(&self) -> usize {
        self.num_simulations
    }

    /// Spot price of the reference asset at inception.
    #[inline]
    pub fn initial_price(&self) -> f64 {
        self.initial_price
    }

    /// Annual dividend yield.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// Annualised volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Annual benchmark (discount) rate.
    #[inline]
    pub fn benchmark_rate(&self) -> f64 {
        self.benchmark_rate
    }

    /// Annual funding spread over the benchmark.
    #[inline]
    pub fn funding_spread(&self) -> f64 {
        self.funding_spread
    }

    /// Benchmark rate plus funding spread.
    #[inline]
    pub fn effective_funding_rate(&self) -> f64 {
        self.effective_funding_rate
    }

    /// Side taken by the desk.
    #[inline]
    pub fn desk_position(&self) -> DeskPosition {
        self.desk_position
    }

    /// Number of settlement periods, `floor(tenor × payment_frequency)`.
    #[inline]
    pub fn num_periods(&self) -> usize {
        num_periods(self.tenor, self.payment_frequency)
    }

    /// Length of one settlement period in years.
    #[inline]
    pub fn period_length(&self) -> f64 {
        1.0 / self.payment_frequency as f64
    }
}

/// Number of whole settlement periods in `tenor` years at `payment_frequency`.
///
/// # Examples
///
/// ```
/// use trs_core::types::trade::num_periods;
///
/// assert_eq!(num_periods(1.0, 4), 4);
/// assert_eq!(num_periods(1.5, 4), 6);
/// assert_eq!(num_periods(0.3, 4), 1);
/// ```
#[inline]
pub fn num_periods(tenor: f64, payment_frequency: u32) -> usize {
    (tenor * payment_frequency as f64 + PERIOD_COUNT_EPSILON).floor() as usize
}

/// Largest number of `f64` cells a price grid may hold.
pub const MAX_GRID_CELLS: usize = isize::MAX as usize / std::mem::size_of::<f64>();

/// Checked shape of a `(num_paths, num_periods + 1)` price grid.
///
/// Returns `(num_periods, num_cells)`. Fails with
/// [`ValidationError::TooLarge`] naming `tenor` when the period count cannot
/// be represented, or `num_simulations` when the total cell count overflows.
///
/// # Examples
///
/// ```
/// use trs_core::types::trade::grid_size;
/// use trs_core::ValidationError;
///
/// assert_eq!(grid_size(1.0, 4, 10), Ok((4, 50)));
/// assert!(matches!(
///     grid_size(1e19, 4, 1),
///     Err(ValidationError::TooLarge { field: "tenor", .. })
/// ));
/// ```
pub fn grid_size(
    tenor: f64,
    payment_frequency: u32,
    num_paths: usize,
) -> Result<(usize, usize), ValidationError> {
    let periods = (tenor * payment_frequency as f64 + PERIOD_COUNT_EPSILON).floor();
    if !(periods < MAX_GRID_CELLS as f64) {
        return Err(ValidationError::TooLarge {
            field: "tenor",
            value: tenor,
        });
    }
    let num_periods = periods as usize;
    let cells = (num_periods + 1)
        .checked_mul(num_paths)
        .filter(|c| *c <= MAX_GRID_CELLS)
        .ok_or(ValidationError::TooLarge {
            field: "num_simulations",
            value: num_paths as f64,
        })?;
    Ok((num_periods, cells))
}

/// Builder for [`TradeTerms`].
///
/// All numeric fields are required except `dividend_yield`,
/// `funding_spread` (both default to 0) and `desk_position`
/// (defaults to [`DeskPosition::Receiver`]).
#[derive(Clone, Debug, Default)]
pub struct TradeTermsBuilder {
    ticker: String,
    notional: Option<f64>,
    tenor: Option<f64>,
    payment_frequency: Option<u32>,
    num_simulations: Option<usize>,
    initial_price: Option<f64>,
    dividend_yield: f64,
    volatility: Option<f64>,
    benchmark_rate: Option<f64>,
    funding_spread: f64,
    desk_position: DeskPosition,
}

impl TradeTermsBuilder {
    /// Creates a builder for the given reference asset.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Self::default()
        }
    }

    /// Sets the notional.
    #[inline]
    pub fn notional(mut self, notional: f64) -> Self {
        self.notional = Some(notional);
        self
    }

    /// Sets the tenor in years.
    #[inline]
    pub fn tenor(mut self, tenor: f64) -> Self {
        self.tenor = Some(tenor);
        self
    }

    /// Sets the number of settlement periods per year.
    #[inline]
    pub fn payment_frequency(mut self, payment_frequency: u32) -> Self {
        self.payment_frequency = Some(payment_frequency);
        self
    }

    /// Sets the number of Monte Carlo paths.
    #[inline]
    pub fn num_simulations(mut self, num_simulations: usize) -> Self {
        self.num_simulations = Some(num_simulations);
        self
    }

    /// Sets the initial price of the reference asset.
    #[inline]
    pub fn initial_price(mut self, initial_price: f64) -> Self {
        self.initial_price = Some(initial_price);
        self
    }

    /// Sets the annual dividend yield.
    #[inline]
    pub fn dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = dividend_yield;
        self
    }

    /// Sets the annualised volatility.
    #[inline]
    pub fn volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Sets the benchmark rate.
    #[inline]
    pub fn benchmark_rate(mut self, benchmark_rate: f64) -> Self {
        self.benchmark_rate = Some(benchmark_rate);
        self
    }

    /// Sets the funding spread.
    #[inline]
    pub fn funding_spread(mut self, funding_spread: f64) -> Self {
        self.funding_spread = funding_spread;
        self
    }

    /// Sets the desk position.
    #[inline]
    pub fn desk_position(mut self, desk_position: DeskPosition) -> Self {
        self.desk_position = desk_position;
        self
    }

    /// Validates every field and builds the terms.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found, naming the field.
    pub fn build(self) -> Result<TradeTerms, ValidationError> {
        let ticker = self.ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(ValidationError::EmptyTicker);
        }

        let notional = ensure_positive("notional", require("notional", self.notional)?)?;
        let tenor = ensure_positive("tenor", require("tenor", self.tenor)?)?;
        let payment_frequency = require("payment_frequency", self.payment_frequency)?;
        ensure_positive_count("payment_frequency", payment_frequency as usize)?;
        let num_simulations = ensure_positive_count(
            "num_simulations",
            require("num_simulations", self.num_simulations)?,
        )?;
        grid_size(tenor, payment_frequency, num_simulations)?;
        let initial_price =
            ensure_positive("initial_price", require("initial_price", self.initial_price)?)?;
        let dividend_yield = ensure_non_negative("dividend_yield", self.dividend_yield)?;
        let volatility = ensure_positive("volatility", require("volatility", self.volatility)?)?;
        let benchmark_rate = ensure_non_negative(
            "benchmark_rate",
            require("benchmark_rate", self.benchmark_rate)?,
        )?;
        let funding_spread = ensure_non_negative("funding_spread", self.funding_spread)?;

        Ok(TradeTerms {
            ticker,
            notional,
            tenor,
            payment_frequency,
            num_simulations,
            initial_price,
            dividend_yield,
            volatility,
            benchmark_rate,
            funding_spread,
            effective_funding_rate: benchmark_rate + funding_spread,
            desk_position: self.desk_position,
        })
    }
}
