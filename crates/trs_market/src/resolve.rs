//! Trade resolution: user overrides merged with market data.
//!
//! Resolution rules:
//! - `ticker`, `notional`, `tenor`, `payment_frequency` and `num_simulations`
//!   are required and validated before any market data is requested.
//! - An override that is present is validated and used as given. It is never
//!   replaced by fetched data or defaults.
//! - An absent field is fetched from the provider. If the fetch fails, the
//!   configured default is substituted and a warning is logged. The current
//!   price has no default; failing to fetch it fails resolution.
//! - The benchmark rate has no fetcher and comes from the override or the
//!   default.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::provider::MarketDataProvider;
use trs_core::defaults::{
    DEFAULT_BENCHMARK_RATE, DEFAULT_DIVIDEND_YIELD, DEFAULT_FUNDING_SPREAD, DEFAULT_LOOKBACK_DAYS,
    DEFAULT_VOLATILITY,
};
use trs_core::validation::{ensure_non_negative, ensure_positive, ensure_positive_count, require};
use trs_core::{DeskPosition, MarketDataError, TradeTerms, TrsError, ValidationError};

/// Pricing request with optional market-data overrides.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TradeRequest {
    /// Reference asset identifier.
    pub ticker: Option<String>,
    /// Notional amount.
    pub notional: Option<f64>,
    /// Tenor in years.
    pub tenor: Option<f64>,
    /// Settlement periods per year.
    pub payment_frequency: Option<u32>,
    /// Number of Monte Carlo paths.
    pub num_simulations: Option<usize>,
    /// Override for the initial price.
    pub initial_price: Option<f64>,
    /// Override for the dividend yield.
    pub dividend_yield: Option<f64>,
    /// Override for the volatility.
    pub volatility: Option<f64>,
    /// Override for the funding spread.
    pub funding_spread: Option<f64>,
    /// Override for the benchmark rate.
    pub benchmark_rate: Option<f64>,
    /// Desk position, `payer` or `receiver`.
    pub desk_position: Option<String>,
}

impl TradeRequest {
    /// Creates a request with the required fields and no overrides.
    pub fn new(
        ticker: impl Into<String>,
        notional: f64,
        tenor: f64,
        payment_frequency: u32,
        num_simulations: usize,
    ) -> Self {
        Self {
            ticker: Some(ticker.into()),
            notional: Some(notional),
            tenor: Some(tenor),
            payment_frequency: Some(payment_frequency),
            num_simulations: Some(num_simulations),
            ..Self::default()
        }
    }
}

/// Fallback values used when the provider cannot supply a field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDefaults {
    /// Benchmark rate.
    pub benchmark_rate: f64,
    /// Funding spread.
    pub funding_spread: f64,
    /// Annualised volatility.
    pub volatility: f64,
    /// Dividend yield.
    pub dividend_yield: f64,
    /// Lookback window passed to the volatility fetch.
    pub lookback_days: usize,
}

impl Default for MarketDefaults {
    fn default() -> Self {
        Self {
            benchmark_rate: DEFAULT_BENCHMARK_RATE,
            funding_spread: DEFAULT_FUNDING_SPREAD,
            volatility: DEFAULT_VOLATILITY,
            dividend_yield: DEFAULT_DIVIDEND_YIELD,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

impl MarketDefaults {
    /// Validates the fallback values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_non_negative("defaults.benchmark_rate", self.benchmark_rate)?;
        ensure_non_negative("defaults.funding_spread", self.funding_spread)?;
        ensure_positive("defaults.volatility", self.volatility)?;
        ensure_non_negative("defaults.dividend_yield", self.dividend_yield)?;
        ensure_positive_count("defaults.lookback_days", self.lookback_days)?;
        Ok(())
    }
}

/// Where a resolved market input came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    /// Supplied explicitly in the request.
    Override,
    /// Fetched from the market-data provider.
    MarketData,
    /// Configured fallback after a failed fetch.
    Default,
}

impl InputSource {
    /// Short label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            InputSource::Override => "override",
            InputSource::MarketData => "market data",
            InputSource::Default => "default",
        }
    }
}

/// Provenance of each market input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct InputSources {
    /// Initial price.
    pub initial_price: InputSource,
    /// Dividend yield.
    pub dividend_yield: InputSource,
    /// Volatility.
    pub volatility: InputSource,
    /// Funding spread.
    pub funding_spread: InputSource,
    /// Benchmark rate.
    pub benchmark_rate: InputSource,
}

/// Output of resolution: validated terms plus provenance.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedTrade {
    /// Immutable trade terms.
    pub terms: TradeTerms,
    /// Where each market input came from.
    pub sources: InputSources,
}

/// Resolves [`TradeRequest`]s against a provider.
pub struct TradeResolver<'a, P: MarketDataProvider + ?Sized> {
    provider: &'a P,
    defaults: MarketDefaults,
}

impl<'a, P: MarketDataProvider + ?Sized> TradeResolver<'a, P> {
    /// Creates a resolver.
    pub fn new(provider: &'a P, defaults: MarketDefaults) -> Self {
        Self { provider, defaults }
    }

    /// Fallback values in use.
    pub fn defaults(&self) -> &MarketDefaults {
        &self.defaults
    }

    /// Resolves a request into trade terms.
    ///
    /// # Errors
    ///
    /// - `TrsError::Validation` for missing or invalid fields
    /// - `TrsError::MarketData` when no price is supplied or fetchable
    pub fn resolve(&self, request: &TradeRequest) -> Result<ResolvedTrade, TrsError> {
        let ticker = require("ticker", request.ticker.clone())?
            .trim()
            .to_uppercase();
        if ticker.is_empty() {
            return Err(ValidationError::EmptyTicker.into());
        }

        let notional = ensure_positive("notional", require("notional", request.notional)?)?;
        let tenor = ensure_positive("tenor", require("tenor", request.tenor)?)?;
        let payment_frequency = require("payment_frequency", request.payment_frequency)?;
        ensure_positive_count("payment_frequency", payment_frequency as usize)?;
        let num_simulations = ensure_positive_count(
            "num_simulations",
            require("num_simulations", request.num_simulations)?,
        )?;
        let desk_position = match request.desk_position.as_deref() {
            Some(s) => s.parse::<DeskPosition>()?,
            None => DeskPosition::default(),
        };

        let (initial_price, price_source) = match request.initial_price {
            Some(p) => (ensure_positive("initial_price", p)?, InputSource::Override),
            None => (
                self.provider.fetch_current_price(&ticker)?,
                InputSource::MarketData,
            ),
        };

        let (dividend_yield, dividend_source) = self.override_or_fetch(
            "dividend_yield",
            request.dividend_yield,
            &ticker,
            self.defaults.dividend_yield,
            false,
            |p, t| p.fetch_dividend_yield(t),
        )?;

        let (volatility, volatility_source) = self.override_or_fetch(
            "volatility",
            request.volatility,
            &ticker,
            self.defaults.volatility,
            true,
            |p, t| p.fetch_historical_volatility(t, self.defaults.lookback_days),
        )?;

        let (funding_spread, spread_source) = self.override_or_fetch(
            "funding_spread",
            request.funding_spread,
            &ticker,
            self.defaults.funding_spread,
            false,
            |p, t| p.estimate_funding_spread(t),
        )?;

        let (benchmark_rate, benchmark_source) = match request.benchmark_rate {
            Some(r) => (ensure_non_negative("benchmark_rate", r)?, InputSource::Override),
            None => (self.defaults.benchmark_rate, InputSource::Default),
        };

        let terms = TradeTerms::builder(ticker)
            .notional(notional)
            .tenor(tenor)
            .payment_frequency(payment_frequency)
            .num_simulations(num_simulations)
            .initial_price(initial_price)
            .dividend_yield(dividend_yield)
            .volatility(volatility)
            .benchmark_rate(benchmark_rate)
            .funding_spread(funding_spread)
            .desk_position(desk_position)
            .build()?;

        debug!(
            ticker = terms.ticker(),
            initial_price,
            dividend_yield,
            volatility,
            funding_spread,
            benchmark_rate,
            "resolved trade terms"
        );

        Ok(ResolvedTrade {
            terms,
            sources: InputSources {
                initial_price: price_source,
                dividend_yield: dividend_source,
                volatility: volatility_source,
                funding_spread: spread_source,
                benchmark_rate: benchmark_source,
            },
        })
    }

    fn override_or_fetch<F>(
        &self,
        field: &'static str,
        value: Option<f64>,
        ticker: &str,
        default: f64,
        strictly_positive: bool,
        fetch: F,
    ) -> Result<(f64, InputSource), ValidationError>
    where
        F: FnOnce(&P, &str) -> Result<f64, MarketDataError>,
    {
        let check = |v: f64| {
            if strictly_positive {
                ensure_positive(field, v)
            } else {
                ensure_non_negative(field, v)
            }
        };

        if let Some(v) = value {
            return Ok((check(v)?, InputSource::Override));
        }

        match fetch(self.provider, ticker).map_err(FetchFailure::Provider) {
            Ok(v) => match check(v) {
                Ok(v) => Ok((v, InputSource::MarketData)),
                Err(e) => Ok(self.fallback(field, default, FetchFailure::Invalid(e))),
            },
            Err(failure) => Ok(self.fallback(field, default, failure)),
        }
    }

    fn fallback(
        &self,
        field: &'static str,
        default: f64,
        failure: FetchFailure,
    ) -> (f64, InputSource) {
        warn!(field, default, reason = %failure, "market data unavailable, using default");
        (default, InputSource::Default)
    }
}

/// Reason a fetched value was discarded.
#[derive(Debug)]
enum FetchFailure {
    Provider(MarketDataError),
    Invalid(ValidationError),
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::Provider(e) => write!(f, "{}", e),
            FetchFailure::Invalid(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Quote, StaticMarketData};
    use approx::assert_relative_eq;

    fn book() -> StaticMarketData {
        StaticMarketData::from_quotes([(
            "MSFT",
            Quote::with_price(420.0).dividend_yield(0.008).volatility(0.22),
        )])
    }

    #[test]
    fn test_fetches_absent_fields() {
        let book = book();
        let resolver = TradeResolver::new(&book, MarketDefaults::default());
        let resolved = resolver
            .resolve(&TradeRequest::new(" msft ", 5_000_000.0, 2.0, 4, 100))
            .unwrap();

        let terms = &resolved.terms;
        assert_eq!(terms.ticker(), "MSFT");
        assert_eq!(terms.initial_price(), 420.0);
        assert_eq!(terms.dividend_yield(), 0.008);
        assert_eq!(terms.volatility(), 0.22);
        assert_eq!(terms.benchmark_rate(), DEFAULT_BENCHMARK_RATE);
        assert_eq!(resolved.sources.initial_price, InputSource::MarketData);
        assert_eq!(resolved.sources.funding_spread, InputSource::MarketData);
        assert_eq!(resolved.sources.benchmark_rate, InputSource::Default);
        // Neutral profile, vol 22% -> term 1.03
        assert_relative_eq!(terms.funding_spread(), 0.015 * 1.03, epsilon = 1e-12);
    }

    #[test]
    fn test_overrides_are_never_replaced() {
        let book = StaticMarketData::new();
        let resolver = TradeResolver::new(&book, MarketDefaults::default());
        let request = TradeRequest {
            initial_price: Some(100.0),
            dividend_yield: Some(0.0),
            volatility: Some(0.4),
            funding_spread: Some(0.0),
            benchmark_rate: Some(0.03),
            desk_position: Some("payer".to_string()),
            ..TradeRequest::new("XYZ", 1_000_000.0, 1.0, 4, 10)
        };
        let resolved = resolver.resolve(&request).unwrap();

        assert_eq!(resolved.terms.volatility(), 0.4);
        assert_eq!(resolved.terms.funding_spread(), 0.0);
        assert_eq!(resolved.terms.benchmark_rate(), 0.03);
        assert_eq!(resolved.terms.desk_position(), DeskPosition::Payer);
        assert_eq!(resolved.sources.volatility, InputSource::Override);
    }

    #[test]
    fn test_invalid_override_is_an_error_not_a_fallback() {
        let book = book();
        let resolver = TradeResolver::new(&book, MarketDefaults::default());
        let request = TradeRequest {
            volatility: Some(-0.2),
            ..TradeRequest::new("MSFT", 1.0, 1.0, 4, 10)
        };
        let err = resolver.resolve(&request).unwrap_err();
        assert!(matches!(
            err,
            TrsError::Validation(ValidationError::NonPositive {
                field: "volatility",
                ..
            })
        ));
    }

    #[test]
    fn test_failed_fetches_fall_back_to_defaults() {
        let book = StaticMarketData::from_quotes([("THIN", Quote::with_price(12.0))]);
        let defaults = MarketDefaults {
            volatility: 0.3,
            dividend_yield: 0.01,
            ..MarketDefaults::default()
        };
        let resolver = TradeResolver::new(&book, defaults);
        let resolved = resolver
            .resolve(&TradeRequest::new("THIN", 1_000.0, 1.0, 12, 10))
            .unwrap();

        assert_eq!(resolved.terms.volatility(), 0.3);
        assert_eq!(resolved.terms.dividend_yield(), 0.01);
        assert_eq!(resolved.sources.volatility, InputSource::Default);
        assert_eq!(resolved.sources.dividend_yield, InputSource::Default);
    }

    #[test]
    fn test_missing_price_is_a_market_data_error() {
        let book = StaticMarketData::new();
        let resolver = TradeResolver::new(&book, MarketDefaults::default());
        let err = resolver
            .resolve(&TradeRequest::new("GHOST", 1.0, 1.0, 4, 10))
            .unwrap_err();
        assert!(matches!(err, TrsError::MarketData(_)));
    }

    #[test]
    fn test_required_fields_checked_before_fetch() {
        let book = StaticMarketData::new();
        let resolver = TradeResolver::new(&book, MarketDefaults::default());

        let request = TradeRequest {
            tenor: None,
            ..TradeRequest::new("GHOST", 1.0, 1.0, 4, 10)
        };
        assert_eq!(
            resolver.resolve(&request).unwrap_err(),
            TrsError::Validation(ValidationError::Missing { field: "tenor" })
        );

        let request = TradeRequest {
            desk_position: Some("sideways".to_string()),
            ..TradeRequest::new("GHOST", 1.0, 1.0, 4, 10)
        };
        assert!(matches!(
            resolver.resolve(&request).unwrap_err(),
            TrsError::Validation(ValidationError::InvalidDeskPosition(_))
        ));
    }

    #[test]
    fn test_defaults_validate() {
        assert!(MarketDefaults::default().validate().is_ok());
        let bad = MarketDefaults {
            volatility: 0.0,
            ..MarketDefaults::default()
        };
        assert!(bad.validate().is_err());
    }
}
