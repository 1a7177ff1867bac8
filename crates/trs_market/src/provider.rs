//! Market data providers.
//!
//! The pricer consumes market data only through [`MarketDataProvider`]. Each
//! operation is a pure function of the ticker that either returns a value or
//! a [`MarketDataError`]; substituting a default is the resolver's job. The
//! one exception is the volatility input to the spread model, which falls
//! back to [`DEFAULT_VOLATILITY`] so the spread keeps its risk premium.

use serde::Deserialize;
use std::collections::HashMap;

use crate::spread::{FundingSpreadModel, IssuerProfile};
use crate::volatility::{historical_volatility, log_returns, MIN_RETURNS};
use trs_core::defaults::{DEFAULT_LOOKBACK_DAYS, DEFAULT_VOLATILITY};
use trs_core::MarketDataError;

/// Source of reference-asset market data.
pub trait MarketDataProvider: Send + Sync {
    /// Current price of the reference asset.
    fn fetch_current_price(&self, ticker: &str) -> Result<f64, MarketDataError>;

    /// Annual dividend yield.
    fn fetch_dividend_yield(&self, ticker: &str) -> Result<f64, MarketDataError>;

    /// Annualised volatility estimated over `lookback_days` trading days.
    fn fetch_historical_volatility(
        &self,
        ticker: &str,
        lookback_days: usize,
    ) -> Result<f64, MarketDataError>;

    /// Estimated annual funding spread for the issuer.
    fn estimate_funding_spread(&self, ticker: &str) -> Result<f64, MarketDataError>;
}

/// Market snapshot for a single reference asset.
///
/// Any field may be absent; the corresponding fetch then fails and the
/// resolver falls back to its configured default.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Quote {
    /// Last traded price.
    pub price: Option<f64>,
    /// Annual dividend yield.
    pub dividend_yield: Option<f64>,
    /// Quoted (implied) volatility, as a fraction or in percent.
    pub volatility: Option<f64>,
    /// Daily closing prices, oldest first.
    pub closes: Vec<f64>,
    /// Issuer fundamentals for the spread model.
    pub profile: IssuerProfile,
}

impl Quote {
    /// Creates a quote with only a price.
    pub fn with_price(price: f64) -> Self {
        Self {
            price: Some(price),
            ..Self::default()
        }
    }

    /// Sets the dividend yield.
    pub fn dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = Some(dividend_yield);
        self
    }

    /// Sets the quoted volatility.
    pub fn volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Sets the closing price history.
    pub fn closes(mut self, closes: Vec<f64>) -> Self {
        self.closes = closes;
        self
    }

    /// Sets the issuer profile.
    pub fn profile(mut self, profile: IssuerProfile) -> Self {
        self.profile = profile;
        self
    }
}

/// In-memory quote book keyed by upper-cased ticker.
///
/// # Examples
///
/// ```
/// use trs_market::{MarketDataProvider, Quote, StaticMarketData};
///
/// let mut book = StaticMarketData::new();
/// book.insert("aapl", Quote::with_price(190.0));
///
/// assert_eq!(book.fetch_current_price("AAPL").unwrap(), 190.0);
/// assert!(book.fetch_dividend_yield("AAPL").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct StaticMarketData {
    quotes: HashMap<String, Quote>,
    spread_model: FundingSpreadModel,
    lookback_days: usize,
}

impl Default for StaticMarketData {
    fn default() -> Self {
        Self {
            quotes: HashMap::new(),
            spread_model: FundingSpreadModel::default(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

impl StaticMarketData {
    /// Creates an empty book with the default spread model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from `(ticker, quote)` pairs.
    pub fn from_quotes<I, S>(quotes: I) -> Self
    where
        I: IntoIterator<Item = (S, Quote)>,
        S: AsRef<str>,
    {
        let mut book = Self::new();
        for (ticker, quote) in quotes {
            book.insert(ticker.as_ref(), quote);
        }
        book
    }

    /// Replaces the funding spread model.
    pub fn with_spread_model(mut self, spread_model: FundingSpreadModel) -> Self {
        self.spread_model = spread_model;
        self
    }

    /// Sets the volatility window used by the spread estimate.
    pub fn with_lookback_days(mut self, lookback_days: usize) -> Self {
        self.lookback_days = lookback_days;
        self
    }

    /// Inserts or replaces a quote.
    pub fn insert(&mut self, ticker: &str, quote: Quote) {
        self.quotes.insert(normalise(ticker), quote);
    }

    /// Number of quoted tickers.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Returns `true` if no ticker is quoted.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    fn quote(&self, ticker: &str, field: &'static str) -> Result<&Quote, MarketDataError> {
        self.quotes
            .get(&normalise(ticker))
            .ok_or_else(|| unavailable(ticker, field))
    }
}

impl MarketDataProvider for StaticMarketData {
    fn fetch_current_price(&self, ticker: &str) -> Result<f64, MarketDataError> {
        let quote = self.quote(ticker, "current price")?;
        quote
            .price
            .or_else(|| quote.closes.last().copied())
            .ok_or_else(|| unavailable(ticker, "current price"))
    }

    fn fetch_dividend_yield(&self, ticker: &str) -> Result<f64, MarketDataError> {
        self.quote(ticker, "dividend yield")?
            .dividend_yield
            .filter(|y| *y >= 0.0)
            .ok_or_else(|| unavailable(ticker, "dividend yield"))
    }

    fn fetch_historical_volatility(
        &self,
        ticker: &str,
        lookback_days: usize,
    ) -> Result<f64, MarketDataError> {
        let quote = self.quote(ticker, "volatility")?;

        // Quoted volatility wins; values above 1 are percentages
        if let Some(v) = quote.volatility.filter(|v| *v > 0.0) {
            return Ok(if v > 1.0 { v / 100.0 } else { v });
        }

        historical_volatility(&quote.closes, lookback_days).ok_or_else(|| {
            MarketDataError::InsufficientHistory {
                ticker: normalise(ticker),
                got: log_returns(&quote.closes).len().min(lookback_days),
                need: MIN_RETURNS,
            }
        })
    }

    fn estimate_funding_spread(&self, ticker: &str) -> Result<f64, MarketDataError> {
        let quote = self.quote(ticker, "funding spread")?;
        let volatility = self
            .fetch_historical_volatility(ticker, self.lookback_days)
            .unwrap_or(DEFAULT_VOLATILITY);
        Ok(self.spread_model.estimate(&quote.profile, Some(volatility)))
    }
}

fn normalise(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

fn unavailable(ticker: &str, field: &'static str) -> MarketDataError {
    MarketDataError::Unavailable {
        ticker: normalise(ticker),
        field,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn book() -> StaticMarketData {
        StaticMarketData::from_quotes([
            (
                "msft",
                Quote::with_price(420.0).dividend_yield(0.008).volatility(24.0),
            ),
            (
                "hist",
                Quote::default().closes((0..40).map(|i| 100.0 + (i % 3) as f64).collect()),
            ),
        ])
    }

    #[test]
    fn test_unknown_ticker_is_unavailable() {
        let err = book().fetch_current_price("nope").unwrap_err();
        assert_eq!(
            err,
            MarketDataError::Unavailable {
                ticker: "NOPE".to_string(),
                field: "current price"
            }
        );
    }

    #[test]
    fn test_percentage_volatility_is_normalised() {
        assert_relative_eq!(
            book().fetch_historical_volatility("MSFT", 252).unwrap(),
            0.24,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_price_falls_back_to_last_close() {
        assert_eq!(book().fetch_current_price("hist").unwrap(), 100.0);
    }

    #[test]
    fn test_volatility_from_history() {
        let vol = book().fetch_historical_volatility("HIST", 252).unwrap();
        assert!(vol > 0.0);
    }

    #[test]
    fn test_insufficient_history_reports_counts() {
        let book = StaticMarketData::from_quotes([("thin", Quote::with_price(10.0))]);
        let err = book.fetch_historical_volatility("thin", 252).unwrap_err();
        assert_eq!(
            err,
            MarketDataError::InsufficientHistory {
                ticker: "THIN".to_string(),
                got: 0,
                need: MIN_RETURNS
            }
        );
    }

    #[test]
    fn test_spread_uses_model() {
        let spread = book().estimate_funding_spread("MSFT").unwrap();
        // Neutral profile, vol 24% -> term 1.06
        assert_relative_eq!(spread, 0.015 * 1.06, epsilon = 1e-12);
    }

    #[test]
    fn test_spread_without_volatility_uses_default() {
        let book = StaticMarketData::from_quotes([("thin", Quote::with_price(10.0))]);
        // No history: 25% fallback -> term 1.075
        assert_relative_eq!(
            book.estimate_funding_spread("THIN").unwrap(),
            0.015 * 1.075,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_spread_honours_lookback() {
        // Calm history followed by a volatile tail
        let mut closes: Vec<f64> = (0..60).map(|i| 100.0 + 0.1 * (i % 2) as f64).collect();
        closes.extend((0..25).map(|i| if i % 2 == 0 { 100.0 } else { 106.0 }));
        let quote = Quote::default().closes(closes.clone());

        let full = StaticMarketData::from_quotes([("mix", quote.clone())]);
        let recent = StaticMarketData::from_quotes([("mix", quote)]).with_lookback_days(20);

        let vol_recent = historical_volatility(&closes, 20).unwrap();
        let vol_full = historical_volatility(&closes, DEFAULT_LOOKBACK_DAYS).unwrap();
        assert!(vol_recent > vol_full);

        let model = FundingSpreadModel::default();
        let profile = IssuerProfile::default();
        assert_relative_eq!(
            recent.estimate_funding_spread("MIX").unwrap(),
            model.estimate(&profile, Some(vol_recent)),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            full.estimate_funding_spread("MIX").unwrap(),
            model.estimate(&profile, Some(vol_full)),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_quote_deserialises_from_toml() {
        let quote: Quote = toml::from_str(
            r#"
            price = 55.5
            dividend_yield = 0.03
            [profile]
            sector = "Utilities"
            beta = 0.6
            "#,
        )
        .unwrap();
        assert_eq!(quote.price, Some(55.5));
        assert_eq!(quote.profile.sector.as_deref(), Some("Utilities"));
        assert!(quote.closes.is_empty());
    }
}
