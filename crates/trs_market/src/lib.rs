//! # trs_market: Market-Data Boundary
//!
//! Resolves a loosely specified [`TradeRequest`] into immutable
//! [`TradeTerms`](trs_core::TradeTerms) by merging user overrides with values
//! fetched from a [`MarketDataProvider`]. This is the collaborator boundary of
//! the pricer; nothing downstream of resolution performs I/O or substitutes
//! defaults.
//!
//! ## Components
//!
//! - [`provider`]: the `MarketDataProvider` trait and the in-memory
//!   [`StaticMarketData`] quote book
//! - [`volatility`]: annualised historical volatility from closing prices
//! - [`spread`]: hybrid multi-factor funding spread estimate
//! - [`resolve`]: request validation, fetch-if-absent and fallback defaults
//!
//! ## Example
//!
//! ```rust
//! use trs_market::{MarketDefaults, Quote, StaticMarketData, TradeRequest, TradeResolver};
//!
//! let mut book = StaticMarketData::new();
//! book.insert("MSFT", Quote::with_price(420.0).dividend_yield(0.008).volatility(0.24));
//!
//! let request = TradeRequest::new("msft", 5_000_000.0, 2.0, 4, 1_000);
//! let resolver = TradeResolver::new(&book, MarketDefaults::default());
//! let resolved = resolver.resolve(&request).unwrap();
//!
//! assert_eq!(resolved.terms.ticker(), "MSFT");
//! assert_eq!(resolved.terms.initial_price(), 420.0);
//! ```

#![warn(missing_docs)]

pub mod provider;
pub mod resolve;
pub mod spread;
pub mod volatility;

pub use provider::{MarketDataProvider, Quote, StaticMarketData};
pub use resolve::{
    InputSource, InputSources, MarketDefaults, ResolvedTrade, TradeRequest, TradeResolver,
};
pub use spread::{FundingSpreadModel, IssuerProfile};
pub use trs_core::MarketDataError;
pub use volatility::historical_volatility;
