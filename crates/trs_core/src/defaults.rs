//! Default values and market conventions.
//!
//! Market fallbacks are used only when the market-data collaborator cannot
//! supply a value; an explicitly given parameter is never replaced.

/// Fallback benchmark rate (e.g. SOFR), annualised.
pub const DEFAULT_BENCHMARK_RATE: f64 = 0.05;

/// Fallback funding spread over the benchmark, annualised.
pub const DEFAULT_FUNDING_SPREAD: f64 = 0.015;

/// Fallback annualised volatility.
pub const DEFAULT_VOLATILITY: f64 = 0.25;

/// Fallback dividend yield.
pub const DEFAULT_DIVIDEND_YIELD: f64 = 0.0;

/// Default trade tenor in years.
pub const DEFAULT_TENOR: f64 = 1.0;

/// Default settlement periods per year (quarterly).
pub const DEFAULT_PAYMENT_FREQUENCY: u32 = 4;

/// Default number of Monte Carlo paths.
pub const DEFAULT_NUM_SIMULATIONS: usize = 1_000;

/// Lookback window for historical volatility, in trading days.
pub const DEFAULT_LOOKBACK_DAYS: usize = 252;

/// Trading days per year used to annualise daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
